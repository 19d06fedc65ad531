//! CLI module for codemap

mod args;

pub use args::{Args, Command};

use crate::analysis::{AnalysisTarget, Analyzer};
use crate::config::Config;
use crate::error::Result;
use crate::gomod::{self, Manifest};
use crate::serve;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Analyze {
            path,
            out,
            serve: serve_addr,
            viz_dir,
            gopath,
            analyze_deps,
            skip,
            config,
            verbose,
        } => {
            // Load config file if it exists
            let mut cfg = if let Some(config_path) = &config {
                Config::load_or_default(config_path)
            } else {
                let default_path = Path::new("codemap.toml");
                Config::load_or_default(default_path)
            };

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(out, serve_addr, viz_dir, gopath, analyze_deps, skip);
            cfg.validate()?;

            if verbose {
                println!("Analyzing: {}", path.display());
                println!("Output: {}", cfg.output.file.display());
                println!("Dependencies: {:?}", cfg.analysis.deps);
                println!("Skip: {:?}", cfg.analysis.skip);
                if let Some(addr) = &cfg.serve.addr {
                    println!("Serve: {} (assets from {})", addr, cfg.serve.viz_dir.display());
                }
            }

            if !path.exists() {
                return Err(crate::error::Error::PathNotFound(path));
            }

            let manifest = Manifest::load(&path)?;
            println!("Analyzing module: {}", manifest.module_path);

            let mut targets = vec![AnalysisTarget {
                fs_root: path.clone(),
                module_path: manifest.module_path.clone(),
            }];

            if !cfg.analysis.deps.is_empty() {
                let cache_root = match &cfg.cache.gomodcache {
                    Some(root) => root.clone(),
                    None => {
                        let root = gomod::discover_gomodcache()?;
                        info!("auto-detected GOMODCACHE: {}", root.display());
                        root
                    }
                };

                let deps = gomod::dependency_targets(&manifest, &cache_root, &cfg.analysis.deps);
                println!("Including {} dependency target(s)", deps.len());
                targets.extend(deps);
            }

            println!("Analyzing {} target(s)...", targets.len());
            let report = Analyzer::new(targets, cfg.analysis.skip.clone()).analyze()?;

            println!(
                "Analysis complete: {} files, {} definitions with observed calls",
                report.files_scanned,
                report.mappings.len()
            );

            if !report.parse_errors.is_empty() {
                println!("\nParse errors ({}):", report.parse_errors.len());
                for (path, err) in report.parse_errors.iter().take(5) {
                    println!("  {}: {}", path.display(), err);
                }
                if report.parse_errors.len() > 5 {
                    println!("  ... and {} more", report.parse_errors.len() - 5);
                }
            }

            let json = serde_json::to_string_pretty(&report.mappings)?;
            if let Some(parent) = cfg.output.file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&cfg.output.file, json)?;
            println!("Call map written to: {}", cfg.output.file.display());

            if let Some(addr) = &cfg.serve.addr {
                serve::serve(addr, &cfg.output.file, &cfg.serve.viz_dir)?;
            }

            Ok(())
        }

        Command::Serve {
            json,
            addr,
            viz_dir,
        } => {
            if !json.exists() {
                return Err(crate::error::Error::PathNotFound(json));
            }
            if !viz_dir.exists() {
                return Err(crate::error::Error::PathNotFound(viz_dir));
            }

            serve::serve(&addr, &json, &viz_dir)
        }

        Command::Version => {
            println!("codemap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build function-level call maps for Go projects
#[derive(Parser, Debug)]
#[command(name = "codemap")]
#[command(about = "Build function-level call maps for Go projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a Go project and write the call map
    Analyze {
        /// Path to the Go project to analyze
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output JSON file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Serve the visualization on this address after writing (e.g. ":8080")
        #[arg(long)]
        serve: Option<String>,

        /// Static-asset directory for the visualizer
        #[arg(long)]
        viz_dir: Option<PathBuf>,

        /// Module cache root (GOMODCACHE); auto-detected when omitted
        #[arg(long)]
        gopath: Option<PathBuf>,

        /// Comma-separated module-path prefixes of dependencies to include
        #[arg(long, value_delimiter = ',')]
        analyze_deps: Vec<String>,

        /// Comma-separated path substrings to skip
        #[arg(long, value_delimiter = ',')]
        skip: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Serve an existing call map and visualizer
    Serve {
        /// Path to the generated JSON artifact
        json: PathBuf,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,

        /// Static-asset directory for the visualizer
        #[arg(long, default_value = "./visualizer")]
        viz_dir: PathBuf,
    },

    /// Show version information
    Version,
}

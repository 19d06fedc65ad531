// Two-pass call-graph analysis
//
// Pass 1 indexes every declaration across all targets; Pass 2 resolves
// call sites against the frozen index. Both passes are order-insensitive
// with respect to file enumeration.

pub mod callsites;
pub mod codemap;
pub mod definitions;
pub mod walker;

pub use codemap::{symbol_id, CallSite, CodeMap, Definition, Mapping};

use crate::error::Result;
use crate::parser::GoParser;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A codebase to analyze: filesystem root plus canonical import root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTarget {
    /// Root directory on the filesystem
    pub fs_root: PathBuf,
    /// The module's import path (e.g. `github.com/my/project`)
    pub module_path: String,
}

/// Outcome of a full analysis run
#[derive(Debug)]
pub struct AnalysisReport {
    /// Mappings with at least one observed call site
    pub mappings: Vec<Mapping>,
    /// Number of admitted source files across all targets
    pub files_scanned: usize,
    /// Files that failed to parse (they contribute nothing)
    pub parse_errors: Vec<(PathBuf, String)>,
}

/// Analysis context carrying the targets and the run-scoped index
pub struct Analyzer {
    targets: Vec<AnalysisTarget>,
    skip: Vec<String>,
}

impl Analyzer {
    pub fn new(targets: Vec<AnalysisTarget>, skip: Vec<String>) -> Self {
        Self { targets, skip }
    }

    /// Run both passes over all targets
    pub fn analyze(self) -> Result<AnalysisReport> {
        let mut parser = GoParser::new()?;
        let mut map = CodeMap::new();
        let mut parse_errors = Vec::new();

        let mut target_files = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let files = walker::source_files(&target.fs_root, &self.skip)?;
            target_files.push((target, files));
        }
        let files_scanned = target_files.iter().map(|(_, f)| f.len()).sum();

        // Pass 1: definitions. The index must be complete before any call
        // site is resolved.
        for (target, files) in &target_files {
            for file in files {
                if let Err(e) = definitions::index_file(&mut parser, &mut map, target, file) {
                    warn!("could not parse {}: {}", file.display(), e);
                    parse_errors.push((file.clone(), e.to_string()));
                }
            }
        }

        // Pass 2: call sites.
        for (target, files) in &target_files {
            for file in files {
                if let Err(e) = callsites::extract_file(&mut parser, &mut map, target, file) {
                    warn!("could not parse {}: {}", file.display(), e);
                }
            }
        }

        Ok(AnalysisReport {
            mappings: map.into_mappings(),
            files_scanned,
            parse_errors,
        })
    }
}

/// Join path components with forward slashes
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute a file's package import path and target-relative slash path
pub(crate) fn file_location(target: &AnalysisTarget, file: &Path) -> (String, String) {
    let rel = file.strip_prefix(&target.fs_root).unwrap_or(file);
    let rel_slash = to_slash(rel);

    let pkg_dir = rel.parent().map(to_slash).unwrap_or_default();
    let package = if pkg_dir.is_empty() {
        target.module_path.clone()
    } else {
        format!("{}/{}", target.module_path, pkg_dir)
    };

    (package, rel_slash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn target(root: &Path) -> AnalysisTarget {
        AnalysisTarget {
            fs_root: root.to_path_buf(),
            module_path: "example.com/app".to_string(),
        }
    }

    #[test]
    fn test_file_location_root_file() {
        let t = target(Path::new("/proj"));
        let (package, rel) = file_location(&t, Path::new("/proj/main.go"));
        assert_eq!(package, "example.com/app");
        assert_eq!(rel, "main.go");
    }

    #[test]
    fn test_file_location_nested_file() {
        let t = target(Path::new("/proj"));
        let (package, rel) = file_location(&t, Path::new("/proj/internal/api/h.go"));
        assert_eq!(package, "example.com/app/internal/api");
        assert_eq!(rel, "internal/api/h.go");
    }

    #[test]
    fn test_analyze_two_packages() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("util")).unwrap();
        fs::write(
            dir.path().join("main.go"),
            "package main\n\nimport \"example.com/app/util\"\n\nfunc main() { util.Helper() }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("util/helper.go"),
            "package util\n\nfunc Helper() { leaf() }\n\nfunc leaf() {}\n",
        )
        .unwrap();

        let report = Analyzer::new(vec![target(dir.path())], vec![])
            .analyze()
            .unwrap();

        assert_eq!(report.files_scanned, 2);
        assert!(report.parse_errors.is_empty());

        let mut ids: Vec<&str> = report
            .mappings
            .iter()
            .map(|m| m.definition.id.as_str())
            .collect();
        ids.sort();
        assert_eq!(
            ids,
            vec!["example.com/app/util.Helper", "example.com/app/util.leaf"]
        );
    }

    #[test]
    fn test_analyze_order_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.go"),
            "package main\n\nfunc A() { B() }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.go"),
            "package main\n\nfunc B() { A() }\n",
        )
        .unwrap();

        // Both directions resolve regardless of which file is seen first,
        // because the index freezes before Pass 2.
        let report = Analyzer::new(vec![target(dir.path())], vec![])
            .analyze()
            .unwrap();

        let mut ids: Vec<&str> = report
            .mappings
            .iter()
            .map(|m| m.definition.id.as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["example.com/app.A", "example.com/app.B"]);
    }

    #[test]
    fn test_analyze_records_parse_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.go"), "package main\n\nfunc A() { A() }\n").unwrap();
        fs::write(dir.path().join("bad.go"), "package main\nfunc ( {\n").unwrap();

        let report = Analyzer::new(vec![target(dir.path())], vec![])
            .analyze()
            .unwrap();

        assert_eq!(report.parse_errors.len(), 1);
        assert!(report.parse_errors[0].0.ends_with("bad.go"));
        // The broken file contributes nothing; the good one still maps.
        assert_eq!(report.mappings.len(), 1);
    }

    #[test]
    fn test_analyze_skip_soundness() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("generated")).unwrap();
        fs::write(
            dir.path().join("app.go"),
            "package main\n\nfunc Keep() { Keep() }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("generated/gen.go"),
            "package generated\n\nfunc Gen() { Gen() }\n",
        )
        .unwrap();

        let full = Analyzer::new(vec![target(dir.path())], vec![])
            .analyze()
            .unwrap();
        let skipped = Analyzer::new(
            vec![target(dir.path())],
            vec!["generated".to_string()],
        )
        .analyze()
        .unwrap();

        assert_eq!(full.mappings.len(), 2);
        assert_eq!(skipped.mappings.len(), 1);
        assert!(skipped
            .mappings
            .iter()
            .all(|m| !m.definition.file_path.contains("generated")));
    }
}

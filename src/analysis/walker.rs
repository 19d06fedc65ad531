// Source file enumeration with skip filtering

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether any non-empty skip substring appears in the path
fn matches_skip(path: &Path, skip: &[String]) -> bool {
    let text = path.to_string_lossy();
    skip.iter()
        .filter(|s| !s.is_empty())
        .any(|s| text.contains(s.as_str()))
}

/// Whether the file name is an admitted Go source file
fn is_go_source(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.ends_with(".go") && !name.ends_with("_test.go"),
        None => false,
    }
}

/// Enumerate Go source files under `root`, depth first.
///
/// Test files are excluded. A skip substring matching a directory prunes
/// its whole subtree; matching a file skips only that file. Yield order is
/// filesystem dependent and not part of the contract.
pub fn source_files(root: &Path, skip: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !matches_skip(e.path(), skip));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_go_source(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

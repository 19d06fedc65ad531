// Module-cache location
//
// The on-disk module cache stores each pinned dependency under
// `<cache-root>/<escaped module path>@<version>`, where uppercase ASCII
// letters in the module path are escaped to `!` + lowercase to survive
// case-insensitive filesystems.

use crate::analysis::AnalysisTarget;
use crate::error::{Error, Result};
use crate::gomod::Manifest;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

/// Escape a module path for use as a cache directory name.
///
/// Every uppercase ASCII letter becomes `!` followed by its lowercase form.
/// A path that already contains `!` cannot be escaped.
pub fn escape_module_path(module_path: &str) -> Result<String> {
    if module_path.contains('!') {
        return Err(Error::mod_cache(format!(
            "module path {} contains '!' and cannot be escaped",
            module_path
        )));
    }

    let mut escaped = String::with_capacity(module_path.len());
    for c in module_path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    Ok(escaped)
}

/// Discover the module cache root by running `go env GOMODCACHE`
pub fn discover_gomodcache() -> Result<PathBuf> {
    let output = Command::new("go")
        .args(["env", "GOMODCACHE"])
        .output()
        .map_err(|e| Error::mod_cache(format!("could not run go env: {}", e)))?;

    if !output.status.success() {
        return Err(Error::mod_cache(format!(
            "go env GOMODCACHE exited with {}",
            output.status
        )));
    }

    let cache = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if cache.is_empty() {
        return Err(Error::mod_cache("go env GOMODCACHE returned nothing"));
    }
    Ok(PathBuf::from(cache))
}

/// Locate requested dependencies in the module cache.
///
/// A requirement is included when any trimmed non-empty prefix is a string
/// prefix of its module path; only the first matching prefix is considered.
/// Requirements whose cache directory is missing or whose path cannot be
/// escaped are skipped with a warning.
pub fn dependency_targets(
    manifest: &Manifest,
    cache_root: &Path,
    prefixes: &[String],
) -> Vec<AnalysisTarget> {
    let mut targets = Vec::new();

    for req in &manifest.requires {
        let matched = prefixes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .any(|p| req.module_path.starts_with(p));
        if !matched {
            continue;
        }

        let escaped = match escape_module_path(&req.module_path) {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping dependency {}: {}", req.module_path, e);
                continue;
            }
        };

        let dep_root = cache_root.join(format!("{}@{}", escaped, req.version));
        if !dep_root.is_dir() {
            warn!(
                "dependency path not found, skipping: {}",
                dep_root.display()
            );
            continue;
        }

        targets.push(AnalysisTarget {
            fs_root: dep_root,
            module_path: req.module_path.clone(),
        });
    }

    targets
}

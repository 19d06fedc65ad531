// go.mod parsing
//
// Reads the module's own import root and its pinned requirements. Only the
// `module` and `require` directives matter here; `go`, `toolchain`,
// `replace`, `exclude` and `retract` are recognized and skipped.

use crate::error::{Error, Result};
use std::path::Path;

/// A pinned dependency from a `require` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module path, e.g. `github.com/gin-gonic/gin`
    pub module_path: String,
    /// Pinned version, e.g. `v1.9.1`
    pub version: String,
}

/// Parsed go.mod manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// The module's declared import root
    pub module_path: String,
    /// Pinned requirements, in declaration order
    pub requires: Vec<Requirement>,
}

impl Manifest {
    /// Load and parse `<dir>/go.mod`
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("go.mod");
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::manifest(&path, format!("could not read: {}", e)))?;
        Self::parse(&path, &contents)
    }

    /// Parse go.mod contents
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut module_path: Option<String> = None;
        let mut requires = Vec::new();
        let mut in_require_block = false;

        for raw in contents.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if in_require_block {
                if line == ")" {
                    in_require_block = false;
                } else if let Some(req) = parse_requirement(line) {
                    requires.push(req);
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("module ") {
                module_path = Some(unquote(rest.trim()).to_string());
            } else if line == "require (" {
                in_require_block = true;
            } else if let Some(rest) = line.strip_prefix("require ") {
                if let Some(req) = parse_requirement(rest.trim()) {
                    requires.push(req);
                }
            }
            // Other directives are skipped.
        }

        let module_path = module_path
            .filter(|m| !m.is_empty())
            .ok_or_else(|| Error::manifest(path, "missing module directive"))?;

        Ok(Self {
            module_path,
            requires,
        })
    }
}

/// Parse a `path version` requirement entry
fn parse_requirement(entry: &str) -> Option<Requirement> {
    let mut fields = entry.split_whitespace();
    let module_path = unquote(fields.next()?).to_string();
    let version = fields.next()?.to_string();
    if module_path.is_empty() || version.is_empty() {
        return None;
    }
    Some(Requirement {
        module_path,
        version,
    })
}

/// Drop a trailing `//` comment, respecting double-quoted strings
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b'/' if !in_quotes && i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                return &line[..i];
            }
            _ => {}
        }
        i += 1;
    }
    line
}

/// Strip a surrounding pair of double quotes
fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub serve: ServeConfig,
    pub cache: CacheConfig,
}

/// Analysis settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Module-path prefixes of dependencies to include
    pub deps: Vec<String>,
    /// Path substrings that prune files and directories
    pub skip: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file: PathBuf,
}

/// Visualization server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Bind address; analysis does not serve when unset
    pub addr: Option<String>,
    pub viz_dir: PathBuf,
}

/// Module cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// GOMODCACHE override; auto-detected via `go env` when unset
    pub gomodcache: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("codemap.json"),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: None,
            viz_dir: PathBuf::from("./visualizer"),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        out: Option<PathBuf>,
        serve_addr: Option<String>,
        viz_dir: Option<PathBuf>,
        gopath: Option<PathBuf>,
        deps: Vec<String>,
        skip: Vec<String>,
    ) {
        if let Some(file) = out {
            self.output.file = file;
        }

        if let Some(addr) = serve_addr {
            self.serve.addr = if addr.is_empty() { None } else { Some(addr) };
        }

        if let Some(dir) = viz_dir {
            self.serve.viz_dir = dir;
        }

        if let Some(cache) = gopath {
            self.cache.gomodcache = Some(cache);
        }

        if !deps.is_empty() {
            self.analysis.deps.extend(deps);
        }

        if !skip.is_empty() {
            self.analysis.skip.extend(skip);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.file.as_os_str().is_empty() {
            return Err(Error::config_validation("output file must not be empty"));
        }

        if let Some(addr) = &self.serve.addr {
            if addr.is_empty() {
                return Err(Error::config_validation("serve addr must not be empty"));
            }
        }

        if self.serve.viz_dir.as_os_str().is_empty() {
            return Err(Error::config_validation("viz_dir must not be empty"));
        }

        Ok(())
    }
}

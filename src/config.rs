//! Scan configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Command-line flags
//! 2. Environment variables (`SYMDEPS_NM`, `SYMDEPS_JOBS`)
//! 3. Config file (`--config path.yaml`)
//! 4. Defaults

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DepError, Result};

/// Default per-artifact extraction timeout (30 seconds)
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 30;
/// Where modules are installed on the target
pub const DEFAULT_INSTALL_PREFIX: &str = "/mnt/system/ko";
pub const DEFAULT_INSTALL_COMMAND: &str = "insmod";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Symbol-dump tool invoked once per artifact
    pub nm: String,

    /// Maximum concurrent extractions
    pub jobs: usize,

    /// Per-artifact extraction timeout; expiry degrades to empty symbol sets
    pub extract_timeout_secs: u64,

    /// Mount path prefix printed in load-order lines
    pub install_prefix: String,

    /// Command word printed in load-order lines
    pub install_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nm: "nm".to_string(),
            jobs: default_jobs(),
            extract_timeout_secs: DEFAULT_EXTRACT_TIMEOUT_SECS,
            install_prefix: DEFAULT_INSTALL_PREFIX.to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// Unlike an implicit config location, an explicitly named file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DepError::PathNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| DepError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })?;
        config.validated()
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(nm) = lookup("SYMDEPS_NM") {
            if !nm.is_empty() {
                self.nm = nm;
            }
        }

        if let Some(jobs) = lookup("SYMDEPS_JOBS") {
            if !jobs.is_empty() {
                self.jobs = jobs.trim().parse().map_err(|_| DepError::ConfigError {
                    reason: format!("SYMDEPS_JOBS must be a positive integer, got '{}'", jobs),
                })?;
            }
        }

        self.validated()
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    /// Clamp `jobs` to at least 1 and reject a zero timeout
    ///
    /// A zero timeout would expire every extraction and leave every artifact
    /// without symbols.
    pub fn validated(mut self) -> Result<Self> {
        self.jobs = self.jobs.max(1);
        if self.extract_timeout_secs == 0 {
            return Err(DepError::ConfigError {
                reason: "extract_timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

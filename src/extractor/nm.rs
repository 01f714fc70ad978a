//! Extractor backed by the `nm` symbol-dump tool
//!
//! Runs `nm <artifact>` once per artifact with a timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{parse_nm_output, SymbolExtractor};
use crate::artifact::SymbolSets;
use crate::config::DEFAULT_EXTRACT_TIMEOUT_SECS;

/// Extractor that shells out to `nm`
pub struct NmExtractor {
    /// Path or name of the nm binary (cross toolchains ship prefixed ones)
    nm_path: String,
    /// Per-artifact timeout
    timeout: Duration,
}

impl NmExtractor {
    pub fn new() -> Self {
        Self {
            nm_path: "nm".to_string(),
            timeout: Duration::from_secs(DEFAULT_EXTRACT_TIMEOUT_SECS),
        }
    }

    /// Set a custom nm binary
    pub fn with_nm_path(mut self, path: impl Into<String>) -> Self {
        self.nm_path = path.into();
        self
    }

    /// Set the per-artifact timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for NmExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SymbolExtractor for NmExtractor {
    fn name(&self) -> &str {
        &self.nm_path
    }

    #[instrument(skip(self), fields(nm = %self.nm_path))]
    async fn extract(&self, path: &Path) -> Result<SymbolSets> {
        // kill_on_drop reaps the child when the timeout drops the future
        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.nm_path)
                .arg(path)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| anyhow::anyhow!("{} timed out after {}s", self.nm_path, self.timeout.as_secs()))?
        .with_context(|| format!("Failed to spawn {}", self.nm_path))?;

        if !output.status.success() {
            bail!("{} exited with {}", self.nm_path, output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sets = parse_nm_output(&stdout);
        debug!(
            defined = sets.defined.len(),
            undefined = sets.undefined.len(),
            "Extracted symbols"
        );
        Ok(sets)
    }
}

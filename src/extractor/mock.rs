//! Mock extractor for testing
//!
//! Serves symbol sets from a table keyed by artifact base name, so graph and
//! scanner tests need neither real binaries nor an `nm` install.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::SymbolExtractor;
use crate::artifact::SymbolSets;

/// Extractor returning predefined symbol sets
#[derive(Default)]
pub struct MockExtractor {
    symbols: HashMap<String, SymbolSets>,
    failing: HashSet<String>,
    /// Every path asked for (for assertions)
    requests: Mutex<Vec<PathBuf>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the symbols of an artifact
    pub fn with_symbols(mut self, file_name: &str, defined: &[&str], undefined: &[&str]) -> Self {
        let defined: BTreeSet<String> = defined.iter().map(|s| s.to_string()).collect();
        let undefined: BTreeSet<String> = undefined.iter().map(|s| s.to_string()).collect();
        self.symbols
            .insert(file_name.to_string(), SymbolSets::new(defined, undefined));
        self
    }

    /// Make extraction of an artifact fail
    pub fn with_failure(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn requests(&self) -> Vec<PathBuf> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SymbolExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, path: &Path) -> Result<SymbolSets> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.to_path_buf());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing.contains(&file_name) {
            bail!("mock: cannot read {}", path.display());
        }

        Ok(self.symbols.get(&file_name).cloned().unwrap_or_default())
    }
}

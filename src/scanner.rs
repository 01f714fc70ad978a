//! Artifact scanner
//!
//! Walks a directory tree, selects the files of one [`ArtifactKind`] and runs
//! the symbol extractor on each of them, at most `jobs` at a time. The graph
//! needs every artifact's symbols, so `scan` returns only once all
//! extractions have finished.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::artifact::{Artifact, ArtifactKind, SymbolSets};
use crate::error::{DepError, Result};
use crate::extractor::SymbolExtractor;

pub struct Scanner {
    kind: ArtifactKind,
    extractor: Arc<dyn SymbolExtractor>,
    jobs: usize,
}

impl Scanner {
    pub fn new(kind: ArtifactKind, extractor: Arc<dyn SymbolExtractor>) -> Self {
        Self { kind, extractor, jobs: 1 }
    }

    /// Set the extraction concurrency limit (at least 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Scan `root` and return the selected artifacts, sorted by name
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn scan(&self, root: &Path) -> Result<Vec<Artifact>> {
        if !root.exists() {
            return Err(DepError::PathNotFound {
                path: root.display().to_string(),
            });
        }
        if !root.is_dir() {
            return Err(DepError::NotADirectory {
                path: root.display().to_string(),
            });
        }

        let selected = self.select(root);
        debug!(
            count = selected.len(),
            extractor = self.extractor.name(),
            "Selected artifacts"
        );

        let symbols = self.extract_all(&selected).await;

        Ok(selected
            .into_iter()
            .zip(symbols)
            .map(|((name, path), symbols)| Artifact::new(name, self.kind, path, symbols))
            .collect())
    }

    /// Walk `root` and keep one path per base name
    ///
    /// Artifacts are keyed by base name only: when two files share a name, the
    /// one walked last wins.
    fn select(&self, root: &Path) -> Vec<(String, PathBuf)> {
        let mut selected: BTreeMap<String, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !self.kind.matches(&file_name) {
                continue;
            }

            let path = entry.path().to_path_buf();
            if let Some(previous) = selected.insert(file_name.to_string(), path) {
                warn!(
                    artifact = %file_name,
                    replaced = %previous.display(),
                    "Duplicate artifact name, keeping the later path"
                );
            }
        }

        selected.into_iter().collect()
    }

    /// Extract symbols for every selected artifact, in input order
    ///
    /// Failed, timed-out or panicked extractions yield empty symbol sets.
    async fn extract_all(&self, selected: &[(String, PathBuf)]) -> Vec<SymbolSets> {
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut join_set = JoinSet::new();

        for (idx, (name, path)) in selected.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let extractor = Arc::clone(&self.extractor);
            let name = name.clone();
            let path = path.clone();

            join_set.spawn(async move {
                // The semaphore is never closed, so acquire only fails on shutdown
                let _permit = semaphore.acquire_owned().await;
                let result = extractor.extract(&path).await;
                (idx, name, result)
            });
        }

        let mut symbols = vec![SymbolSets::default(); selected.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, _, Ok(sets))) => symbols[idx] = sets,
                Ok((_, name, Err(e))) => {
                    warn!(artifact = %name, error = %e, "Symbol extraction failed, treating as empty");
                }
                Err(e) => {
                    warn!(error = %e, "Symbol extraction task aborted");
                }
            }
        }

        symbols
    }
}

//! symdeps - symbol-based dependency checker for kernel modules and libraries
//!
//! Scans a directory for `.ko`, `.a` or `.so` artifacts, reads their symbol
//! tables with `nm` and infers which artifact depends on which. From that
//! graph it renders dependency trees, linker flags for libraries and a load
//! order for kernel modules.

pub mod artifact;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod linker;
pub mod load_order;
pub mod render;
pub mod report;
pub mod scanner;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

pub use artifact::{Artifact, ArtifactKind, SymbolSets};
pub use config::Config;
pub use error::{DepError, FixSuggestion};
pub use extractor::{MockExtractor, NmExtractor, SymbolExtractor};
pub use graph::DependencyGraph;
pub use load_order::load_order;
pub use render::TreeRenderer;
pub use report::{JsonReport, OutputFormat, ReportOptions};
pub use scanner::Scanner;

/// Scan `root` with `nm` and build the dependency graph
pub async fn analyze(kind: ArtifactKind, root: &Path, config: &Config) -> error::Result<DependencyGraph> {
    let extractor = NmExtractor::new()
        .with_nm_path(&config.nm)
        .with_timeout(config.extract_timeout());
    analyze_with(kind, root, Arc::new(extractor), config.jobs).await
}

/// Same as [`analyze`] with a caller-provided extractor
pub async fn analyze_with(
    kind: ArtifactKind,
    root: &Path,
    extractor: Arc<dyn SymbolExtractor>,
    jobs: usize,
) -> error::Result<DependencyGraph> {
    let artifacts = Scanner::new(kind, extractor).with_jobs(jobs).scan(root).await?;
    let graph = DependencyGraph::build(artifacts);

    for cycle in graph.cycles() {
        warn!(artifacts = %cycle.join(" <-> "), "Dependency cycle, load order may be wrong here");
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn broken_artifact_scenario() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["broken.a", "libfoo.a", "libbar.a"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let mock = MockExtractor::new()
            .with_failure("broken.a")
            .with_symbols("libfoo.a", &["foo"], &["bar", "missing"])
            .with_symbols("libbar.a", &["bar"], &[]);

        let graph = analyze_with(ArtifactKind::StaticLib, dir.path(), Arc::new(mock), 2)
            .await
            .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies("broken.a").count(), 0);
        assert_eq!(graph.dependents("broken.a").count(), 0);
        assert_eq!(graph.dependencies("libfoo.a").collect::<Vec<_>>(), vec!["libbar.a"]);

        let text = report::render_text(&graph, ArtifactKind::StaticLib, &ReportOptions::default()).unwrap();
        assert!(text.starts_with("# broken.a\n\n# libbar.a\n"));
        assert!(text.contains("-lbar -lfoo"));
    }
}

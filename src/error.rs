//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Errors surfaced to the caller.
///
/// Per-artifact extraction failures are not listed here: the scanner degrades
/// them to empty symbol sets instead of failing the run.
#[derive(Error, Debug)]
pub enum DepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Usage errors (DEP-010 to DEP-012)
    // ─────────────────────────────────────────────────────────────

    #[error("DEP-010: Path '{path}' does not exist")]
    PathNotFound { path: String },

    #[error("DEP-011: Path '{path}' is not a directory")]
    NotADirectory { path: String },

    #[error("DEP-012: Invalid configuration: {reason}")]
    ConfigError { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Graph queries (DEP-020)
    // ─────────────────────────────────────────────────────────────

    #[error("DEP-020: Artifact '{name}' is not part of the scanned set")]
    ArtifactNotFound { name: String },
}

impl FixSuggestion for DepError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DepError::Io(_) => Some("Check file path and permissions"),
            DepError::Json(_) => None,
            DepError::PathNotFound { .. } => Some("Pass an existing directory to scan"),
            DepError::NotADirectory { .. } => {
                Some("Pass the directory containing the artifacts, not a single file")
            }
            DepError::ConfigError { .. } => {
                Some("Check YAML syntax and the config keys: nm, jobs, extract_timeout_secs, install_prefix, install_command")
            }
            DepError::ArtifactNotFound { .. } => {
                Some("Use the bare file name of an artifact found by the scan")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DepError>;

//! # Symbol Extraction
//!
//! Turns one artifact on disk into its defined/undefined symbol sets.
//!
//! - [`SymbolExtractor`] - Core trait, one call per artifact
//! - [`NmExtractor`] - Production extractor shelling out to `nm`
//! - [`MockExtractor`] - Test extractor with a fixed symbol table per file name
//!
//! Extractors report failures as `Err`; deciding that a failed artifact simply
//! has no symbols is the scanner's job.
//!
//! ## Symbol classes
//!
//! | nm letter | Meaning | Set |
//! |-----------|---------|-----|
//! | `U` | undefined reference | undefined |
//! | `T` | text (code) | defined |
//! | `D` | initialized data | defined |
//! | `B` | uninitialized data | defined |
//! | `R` | read-only data | defined |
//! | anything else | local, weak, debug, ... | ignored |

mod mock;
mod nm;

pub use mock::MockExtractor;
pub use nm::NmExtractor;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::artifact::SymbolSets;

/// Extracts the symbol sets of a single artifact
#[async_trait]
pub trait SymbolExtractor: Send + Sync {
    /// Extractor name, for logs
    fn name(&self) -> &str;

    async fn extract(&self, path: &Path) -> Result<SymbolSets>;
}

/// Classify `nm` output into symbol sets
///
/// Lines carry `[address] class name`. Lines with fewer than two fields
/// (blank lines, `member.o:` headers of archives) are skipped.
pub fn parse_nm_output(output: &str) -> SymbolSets {
    let mut defined = BTreeSet::new();
    let mut undefined = BTreeSet::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        // With an address column the class letter moves to the second field
        let (class, name) = if parts.len() == 3 {
            (parts[1], parts[2])
        } else {
            (parts[0], parts[1])
        };

        match class {
            "U" => {
                undefined.insert(name.to_string());
            }
            "T" | "D" | "B" | "R" => {
                defined.insert(name.to_string());
            }
            _ => {}
        }
    }

    SymbolSets::new(defined, undefined)
}

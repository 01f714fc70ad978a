//! Artifact kinds, file selection and per-artifact symbol sets

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

/// Suffix of loadable kernel modules
pub const MODULE_SUFFIX: &str = ".ko";
/// Suffix of static archives
pub const STATIC_LIB_SUFFIX: &str = ".a";
/// Suffix of shared objects
pub const SHARED_LIB_SUFFIX: &str = ".so";
/// Conventional library-name prefix
pub const LIB_PREFIX: &str = "lib";

/// Kind of binary artifact a scan looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Loadable kernel module (`*.ko`)
    #[value(name = "ko")]
    Ko,
    /// Static archive (`*.a`)
    #[value(name = "static_lib")]
    StaticLib,
    /// Shared object (`*.so`, `libfoo.so.1.2.3`)
    #[value(name = "dynamic_lib")]
    DynamicLib,
}

impl ArtifactKind {
    /// Whether a file with this base name belongs to the kind
    pub fn matches(self, file_name: &str) -> bool {
        match self {
            ArtifactKind::Ko => file_name.ends_with(MODULE_SUFFIX),
            ArtifactKind::StaticLib => file_name.ends_with(STATIC_LIB_SUFFIX),
            ArtifactKind::DynamicLib => {
                file_name.ends_with(SHARED_LIB_SUFFIX)
                    || (file_name.starts_with(LIB_PREFIX) && file_name.contains(".so."))
            }
        }
    }

    /// Libraries get a linker-flag line per tree
    pub fn is_library(self) -> bool {
        matches!(self, ArtifactKind::StaticLib | ArtifactKind::DynamicLib)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Ko => "ko",
            ArtifactKind::StaticLib => "static_lib",
            ArtifactKind::DynamicLib => "dynamic_lib",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defined and undefined symbol names of one artifact
///
/// The two sets are disjoint once built through [`SymbolSets::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSets {
    pub defined: BTreeSet<String>,
    pub undefined: BTreeSet<String>,
}

impl SymbolSets {
    /// Build the sets, dropping undefined references the artifact satisfies itself
    pub fn new(defined: BTreeSet<String>, mut undefined: BTreeSet<String>) -> Self {
        undefined.retain(|sym| !defined.contains(sym));
        Self { defined, undefined }
    }

    pub fn is_empty(&self) -> bool {
        self.defined.is_empty() && self.undefined.is_empty()
    }
}

/// One scanned artifact, keyed by its base file name
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: Arc<str>,
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub symbols: SymbolSets,
}

impl Artifact {
    pub fn new(name: impl Into<Arc<str>>, kind: ArtifactKind, path: PathBuf, symbols: SymbolSets) -> Self {
        Self { name: name.into(), kind, path, symbols }
    }

    #[inline]
    pub fn defined(&self) -> &BTreeSet<String> {
        &self.symbols.defined
    }

    #[inline]
    pub fn undefined(&self) -> &BTreeSet<String> {
        &self.symbols.undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn module_selection() {
        assert!(ArtifactKind::Ko.matches("cvi_pwm.ko"));
        assert!(!ArtifactKind::Ko.matches("cvi_pwm.ko.xz"));
        assert!(!ArtifactKind::Ko.matches("libfoo.a"));
    }

    #[test]
    fn static_lib_selection() {
        assert!(ArtifactKind::StaticLib.matches("libfoo.a"));
        assert!(ArtifactKind::StaticLib.matches("foo.a"));
        assert!(!ArtifactKind::StaticLib.matches("libfoo.so"));
    }

    #[test]
    fn dynamic_lib_selection_includes_versioned_names() {
        assert!(ArtifactKind::DynamicLib.matches("libfoo.so"));
        assert!(ArtifactKind::DynamicLib.matches("plugin.so"));
        assert!(ArtifactKind::DynamicLib.matches("libfoo.so.1.2.3"));
        assert!(!ArtifactKind::DynamicLib.matches("foo.so.1"));
        assert!(!ArtifactKind::DynamicLib.matches("libfoo.a"));
    }

    #[test]
    fn only_libraries_get_link_flags() {
        assert!(!ArtifactKind::Ko.is_library());
        assert!(ArtifactKind::StaticLib.is_library());
        assert!(ArtifactKind::DynamicLib.is_library());
    }

    #[test]
    fn self_satisfied_references_are_not_undefined() {
        let sets = SymbolSets::new(set(&["init", "helper"]), set(&["helper", "printk"]));
        assert_eq!(sets.undefined, set(&["printk"]));
        assert!(sets.defined.is_disjoint(&sets.undefined));
    }
}

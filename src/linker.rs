//! Transitive closure and linker flags for libraries
//!
//! The closure of a library is the library itself plus everything reachable
//! through dependency edges. Formatted as `-l` flags it is the argument line
//! needed to link against the library.

use std::collections::BTreeSet;

use crate::artifact::LIB_PREFIX;
use crate::error::Result;
use crate::graph::DependencyGraph;

/// Root plus all transitive dependencies
pub fn transitive_closure<'g>(graph: &'g DependencyGraph, root: &str) -> Result<BTreeSet<&'g str>> {
    let root = graph.require(root)?;

    let mut visited: BTreeSet<&'g str> = BTreeSet::new();
    collect(graph, &root.name, &mut visited);
    Ok(visited)
}

/// Depth-first walk; `visited` doubles as the result
fn collect<'g>(graph: &'g DependencyGraph, node: &'g str, visited: &mut BTreeSet<&'g str>) {
    if !visited.insert(node) {
        return;
    }
    for dep in graph.dependencies(node) {
        collect(graph, dep, visited);
    }
}

/// `libfoo.a` / `libfoo.so.1.2.3` -> `-lfoo`
///
/// Everything after the first `.` goes, which also drops shared-object
/// version suffixes.
pub fn format_lib_name(file_name: &str) -> String {
    let stem = file_name.strip_prefix(LIB_PREFIX).unwrap_or(file_name);
    let stem = stem.split('.').next().unwrap_or(stem);
    format!("-l{}", stem)
}

/// Deduplicated, sorted `-l` flags for a set of libraries
pub fn linker_flags<'a>(libraries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    libraries
        .into_iter()
        .map(format_lib_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Linker argument line for `root`, or `None` when it has no dependencies
pub fn link_line(graph: &DependencyGraph, root: &str) -> Result<Option<String>> {
    let closure = transitive_closure(graph, root)?;
    if closure.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(linker_flags(closure).join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::graph_of;

    #[test]
    fn format_static_and_shared_names() {
        assert_eq!(format_lib_name("libfoo.a"), "-lfoo");
        assert_eq!(format_lib_name("libfoo.so"), "-lfoo");
        assert_eq!(format_lib_name("libfoo.so.1.2.3"), "-lfoo");
        assert_eq!(format_lib_name("plugin.so"), "-lplugin");
        assert_eq!(format_lib_name("libcvi_bin_isp.so"), "-lcvi_bin_isp");
    }

    #[test]
    fn flags_sorted_and_deduplicated() {
        assert_eq!(linker_flags(["libfoo.a", "libbar.so"]), vec!["-lbar", "-lfoo"]);
        assert_eq!(linker_flags(["libfoo.so", "libfoo.so.1"]), vec!["-lfoo"]);
    }

    #[test]
    fn closure_of_leaf_is_itself() {
        let graph = graph_of(&["libfoo.a", "libbar.a"], &[("libbar.a", "libfoo.a")]);
        let closure = transitive_closure(&graph, "libfoo.a").unwrap();
        assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec!["libfoo.a"]);
        assert_eq!(link_line(&graph, "libfoo.a").unwrap(), None);
    }

    #[test]
    fn closure_is_transitive() {
        let graph = graph_of(
            &["liba.a", "libb.a", "libc.a", "libd.a"],
            &[("liba.a", "libb.a"), ("libb.a", "libc.a")],
        );
        let closure = transitive_closure(&graph, "liba.a").unwrap();
        assert_eq!(closure.into_iter().collect::<Vec<_>>(), vec!["liba.a", "libb.a", "libc.a"]);
        assert_eq!(link_line(&graph, "liba.a").unwrap().as_deref(), Some("-la -lb -lc"));
    }

    #[test]
    fn closure_survives_cycles() {
        let graph = graph_of(
            &["libx.so", "liby.so.2"],
            &[("libx.so", "liby.so.2"), ("liby.so.2", "libx.so")],
        );
        let closure = transitive_closure(&graph, "libx.so").unwrap();
        assert_eq!(closure.len(), 2);
        assert_eq!(link_line(&graph, "liby.so.2").unwrap().as_deref(), Some("-lx -ly"));
    }
}

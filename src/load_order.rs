//! Module load order
//!
//! Post-order depth-first walk over every module with one visited set shared
//! by the whole walk, so each module is emitted exactly once and after the
//! modules it depends on.
//!
//! Cycles are not resolved: inside a cycle the module reached first is
//! emitted after its partner only because the partner finds it already
//! visited. The order is complete and deterministic, but not necessarily
//! dependency-correct for cyclic modules. Use [`DependencyGraph::cycles`] to
//! find those.

use std::collections::HashSet;

use crate::graph::DependencyGraph;

/// Every artifact exactly once, dependencies before dependents
///
/// Roots and their dependencies are walked in lexicographic order.
pub fn load_order(graph: &DependencyGraph) -> Vec<&str> {
    let mut visited: HashSet<&str> = HashSet::with_capacity(graph.len());
    let mut order: Vec<&str> = Vec::with_capacity(graph.len());

    for name in graph.names() {
        visit(graph, name, &mut visited, &mut order);
    }

    order
}

fn visit<'g>(
    graph: &'g DependencyGraph,
    node: &'g str,
    visited: &mut HashSet<&'g str>,
    order: &mut Vec<&'g str>,
) {
    if !visited.insert(node) {
        return;
    }
    for dep in graph.dependencies(node) {
        visit(graph, dep, visited, order);
    }
    order.push(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{artifact, graph_of};

    fn position(order: &[&str], name: &str) -> usize {
        order.iter().position(|n| *n == name).unwrap()
    }

    #[test]
    fn chain_is_reversed() {
        let graph = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(load_order(&graph), vec!["c", "b", "a"]);
    }

    #[test]
    fn helper_fn_scenario() {
        let graph = DependencyGraph::build([
            artifact("mod_a.ko", &[], &["helper_fn"]),
            artifact("mod_b.ko", &["helper_fn"], &[]),
        ]);
        assert_eq!(load_order(&graph), vec!["mod_b.ko", "mod_a.ko"]);
    }

    #[test]
    fn diamond_lists_shared_dependency_once() {
        let graph = graph_of(
            &["top", "left", "right", "base", "lonely"],
            &[("top", "left"), ("top", "right"), ("left", "base"), ("right", "base")],
        );
        let order = load_order(&graph);

        assert_eq!(order.len(), 5);
        for (from, to) in [("top", "left"), ("top", "right"), ("left", "base"), ("right", "base")] {
            assert!(position(&order, to) < position(&order, from), "{} before {}", to, from);
        }
    }

    #[test]
    fn cycle_still_covers_every_module_once() {
        let graph = graph_of(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("b", "c")],
        );
        let order = load_order(&graph);

        // a is walked first, so b finds it already visited and lands before it
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn empty_graph() {
        assert!(load_order(&DependencyGraph::default()).is_empty());
    }
}

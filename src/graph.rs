//! Dependency graph inferred from symbol tables
//!
//! `A -> B` exists iff some symbol undefined in `A` is defined in `B`, and the
//! edge remembers exactly those symbols. Edges are found through a
//! symbol -> defining-artifacts index instead of comparing every pair of
//! artifacts; the resulting edges are the same.
//!
//! Nothing guarantees the result is acyclic (two modules may export symbols to
//! each other), so consumers must not assume a DAG.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::artifact::Artifact;
use crate::error::{DepError, Result};

/// Immutable graph of scanned artifacts and their inferred dependencies
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// name -> artifact
    artifacts: BTreeMap<Arc<str>, Artifact>,
    /// dependent -> dependency -> shared symbols
    edges: BTreeMap<Arc<str>, BTreeMap<Arc<str>, BTreeSet<String>>>,
}

impl DependencyGraph {
    /// Build the graph from one scan batch
    ///
    /// Undefined symbols nobody in the batch defines are dropped silently.
    /// Artifacts sharing a name replace earlier ones.
    pub fn build(artifacts: impl IntoIterator<Item = Artifact>) -> Self {
        let artifacts: BTreeMap<Arc<str>, Artifact> = artifacts
            .into_iter()
            .map(|a| (Arc::clone(&a.name), a))
            .collect();

        let mut definers: HashMap<&str, Vec<&Arc<str>>> = HashMap::new();
        for (name, artifact) in &artifacts {
            for sym in artifact.defined() {
                definers.entry(sym.as_str()).or_default().push(name);
            }
        }

        let mut edges: BTreeMap<Arc<str>, BTreeMap<Arc<str>, BTreeSet<String>>> = BTreeMap::new();
        for (name, artifact) in &artifacts {
            for sym in artifact.undefined() {
                let Some(owners) = definers.get(sym.as_str()) else {
                    continue;
                };
                for &owner in owners {
                    // Never compare an artifact against itself
                    if owner == name {
                        continue;
                    }
                    edges
                        .entry(Arc::clone(name))
                        .or_default()
                        .entry(Arc::clone(owner))
                        .or_default()
                        .insert(sym.clone());
                }
            }
        }

        Self { artifacts, edges }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Artifact names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(|k| &**k)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.artifacts.contains_key(name)
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.get(name)
    }

    /// Like [`artifact`](Self::artifact), but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<&Artifact> {
        self.artifact(name).ok_or_else(|| DepError::ArtifactNotFound {
            name: name.to_string(),
        })
    }

    /// Direct dependencies of an artifact, in lexicographic order
    pub fn dependencies<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|deps| deps.keys().map(|k| &**k))
    }

    /// Artifacts that depend directly on `name`
    pub fn dependents<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |(_, deps)| deps.contains_key(name))
            .map(|(from, _)| &**from)
    }

    /// Symbols that justify the edge `from -> to`, if there is one
    pub fn shared_symbols(&self, from: &str, to: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(from).and_then(|deps| deps.get(to))
    }

    /// All edges as `(dependent, dependency, shared symbols)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &BTreeSet<String>)> {
        self.edges.iter().flat_map(|(from, deps)| {
            deps.iter()
                .map(move |(to, syms)| (&**from, &**to, syms))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Groups of artifacts that depend on each other in a cycle
    ///
    /// Each group is sorted, and groups are ordered by their first member.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::with_capacity(self.len(), self.edge_count());
        let nodes: HashMap<&str, NodeIndex> =
            self.names().map(|name| (name, graph.add_node(name))).collect();

        for (from, to, _) in self.edges() {
            graph.add_edge(nodes[from], nodes[to], ());
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut members: Vec<String> =
                    component.iter().map(|&idx| graph[idx].to_string()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}

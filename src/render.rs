//! Dependency tree rendering
//!
//! ```text
//! # mod_a.ko
//!     ├── mod_b.ko (helper_fn)
//!     │   └── mod_c.ko (core_fn)
//!     └── mod_c.ko (core_fn)
//! ```
//!
//! Depth-first, pre-order, children sorted by name. A node already printed in
//! the current tree is printed again where it is met but not expanded, which
//! also stops cycles.

use std::collections::HashSet;

use colored::Colorize;

use crate::error::Result;
use crate::graph::DependencyGraph;

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const BAR: &str = "│   ";
const BLANK: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer {
    /// Annotate each child with the symbols that created the edge
    verbose: bool,
    /// Color the header line
    color: bool,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render the tree rooted at `root`, one line per node
    pub fn render(&self, graph: &DependencyGraph, root: &str) -> Result<String> {
        graph.require(root)?;

        let mut out = String::new();
        let header = format!("# {}", root);
        if self.color {
            out.push_str(&header.green().to_string());
        } else {
            out.push_str(&header);
        }
        out.push('\n');

        // Visited set is scoped to this one tree
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root);
        self.render_children(graph, root, BLANK, &mut visited, &mut out);

        Ok(out)
    }

    fn render_children<'g>(
        &self,
        graph: &'g DependencyGraph,
        parent: &str,
        prefix: &str,
        visited: &mut HashSet<&'g str>,
        out: &mut String,
    ) {
        let children: Vec<&'g str> = graph.dependencies(parent).collect();
        let count = children.len();

        for (i, child) in children.into_iter().enumerate() {
            let is_last = i + 1 == count;

            out.push_str(prefix);
            out.push_str(if is_last { CORNER } else { TEE });
            out.push_str(child);
            if self.verbose {
                if let Some(symbols) = graph.shared_symbols(parent, child) {
                    let joined: Vec<&str> = symbols.iter().map(String::as_str).collect();
                    out.push_str(&format!(" ({})", joined.join(", ")));
                }
            }
            out.push('\n');

            if !visited.insert(child) {
                continue;
            }

            let child_prefix = format!("{}{}", prefix, if is_last { BLANK } else { BAR });
            self.render_children(graph, child, &child_prefix, visited, out);
        }
    }
}

//! Report output (text or JSON)
//!
//! Text layout, artifacts in name order:
//!
//! ```text
//! # libfoo.a
//!     └── libbar.a
//!
//! -lbar -lfoo
//!
//! ```
//!
//! Modules get no flag line; instead a `Load order:` section follows all
//! trees with one install command per module.

use std::path::PathBuf;

use serde::Serialize;

use crate::artifact::ArtifactKind;
use crate::config::{DEFAULT_INSTALL_COMMAND, DEFAULT_INSTALL_PREFIX};
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::linker::link_line;
use crate::load_order::load_order;
use crate::render::TreeRenderer;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Trees, linker flags and load order (default)
    #[default]
    Text,

    /// One JSON document
    Json,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub verbose: bool,
    pub color: bool,
    pub install_prefix: String,
    pub install_command: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            color: false,
            install_prefix: DEFAULT_INSTALL_PREFIX.to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
        }
    }
}

/// `insmod /mnt/system/ko/<name>`
pub fn install_line(options: &ReportOptions, name: &str) -> String {
    format!(
        "{} {}/{}",
        options.install_command,
        options.install_prefix.trim_end_matches('/'),
        name
    )
}

pub fn render_text(graph: &DependencyGraph, kind: ArtifactKind, options: &ReportOptions) -> Result<String> {
    let renderer = TreeRenderer::new()
        .with_verbose(options.verbose)
        .with_color(options.color);

    let mut out = String::new();
    for name in graph.names() {
        out.push_str(&renderer.render(graph, name)?);

        if kind.is_library() {
            if let Some(line) = link_line(graph, name)? {
                out.push('\n');
                out.push_str(&line);
                out.push('\n');
            }
        }

        out.push('\n');
    }

    if kind == ArtifactKind::Ko {
        out.push_str("\nLoad order:\n");
        for module in load_order(graph) {
            out.push_str(&install_line(options, module));
            out.push('\n');
        }
    }

    Ok(out)
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub kind: ArtifactKind,
    pub artifacts: Vec<JsonArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_order: Option<Vec<String>>,
    pub cycles: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct JsonArtifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub defined_count: usize,
    pub undefined_count: usize,
    pub dependencies: Vec<JsonDependency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_flags: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonDependency {
    pub name: String,
    pub symbols: Vec<String>,
}

impl JsonReport {
    pub fn build(graph: &DependencyGraph, kind: ArtifactKind) -> Result<Self> {
        let mut artifacts = Vec::with_capacity(graph.len());

        for artifact in graph.artifacts() {
            let name: &str = &artifact.name;
            let dependencies = graph
                .dependencies(name)
                .map(|dep| JsonDependency {
                    name: dep.to_string(),
                    symbols: graph
                        .shared_symbols(name, dep)
                        .map(|syms| syms.iter().cloned().collect())
                        .unwrap_or_default(),
                })
                .collect();

            let link_flags = if kind.is_library() {
                link_line(graph, name)?
            } else {
                None
            };

            artifacts.push(JsonArtifact {
                name: name.to_string(),
                kind: artifact.kind,
                path: artifact.path.clone(),
                defined_count: artifact.defined().len(),
                undefined_count: artifact.undefined().len(),
                dependencies,
                link_flags,
            });
        }

        let load_order = (kind == ArtifactKind::Ko)
            .then(|| load_order(graph).into_iter().map(String::from).collect());

        Ok(Self {
            kind,
            artifacts,
            load_order,
            cycles: graph.cycles(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{artifact, graph_of};

    #[test]
    fn module_report_ends_with_load_order() {
        let graph = DependencyGraph::build([
            artifact("mod_a.ko", &["a_init"], &["helper_fn"]),
            artifact("mod_b.ko", &["helper_fn"], &[]),
        ]);
        let text = render_text(&graph, ArtifactKind::Ko, &ReportOptions::default()).unwrap();
        assert_eq!(
            text,
            "# mod_a.ko\n    └── mod_b.ko\n\n\
             # mod_b.ko\n\n\
             \nLoad order:\n\
             insmod /mnt/system/ko/mod_b.ko\n\
             insmod /mnt/system/ko/mod_a.ko\n"
        );
    }

    #[test]
    fn library_report_has_flag_lines() {
        let graph = graph_of(&["libbar.so", "libfoo.a"], &[("libfoo.a", "libbar.so")]);
        let text = render_text(&graph, ArtifactKind::StaticLib, &ReportOptions::default()).unwrap();
        assert_eq!(
            text,
            "# libbar.so\n\n\
             # libfoo.a\n    └── libbar.so\n\n-lbar -lfoo\n\n"
        );
        assert!(!text.contains("Load order"));
    }

    #[test]
    fn custom_install_prefix() {
        let options = ReportOptions {
            install_prefix: "/lib/modules/".to_string(),
            install_command: "modprobe".to_string(),
            ..ReportOptions::default()
        };
        assert_eq!(install_line(&options, "cvi_pwm.ko"), "modprobe /lib/modules/cvi_pwm.ko");
    }

    #[test]
    fn json_report_for_modules() {
        let graph = graph_of(&["a.ko", "b.ko"], &[("a.ko", "b.ko"), ("b.ko", "a.ko")]);
        let report = JsonReport::build(&graph, ArtifactKind::Ko).unwrap();

        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.artifacts[0].dependencies[0].name, "b.ko");
        assert_eq!(report.artifacts[0].dependencies[0].symbols, vec!["b.ko_sym"]);
        assert_eq!(report.load_order.as_deref().map(|o| o.len()), Some(2));
        assert_eq!(report.cycles, vec![vec!["a.ko".to_string(), "b.ko".to_string()]]);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["kind"], "ko");
        assert_eq!(json["artifacts"][0]["kind"], "ko");
        assert!(json["artifacts"][0].get("link_flags").is_none());
    }

    #[test]
    fn json_report_for_libraries() {
        let graph = graph_of(&["liba.a", "libb.a"], &[("liba.a", "libb.a")]);
        let report = JsonReport::build(&graph, ArtifactKind::StaticLib).unwrap();

        assert!(report.load_order.is_none());
        assert_eq!(report.artifacts[0].kind, ArtifactKind::StaticLib);
        assert_eq!(report.artifacts[0].link_flags.as_deref(), Some("-la -lb"));
        assert_eq!(report.artifacts[1].link_flags, None);
    }
}

//! JSON emission for downstream tooling.
//!
//! A flat `{ name, nodes, edges }` document: nodes carry their id, label,
//! and kind; edges reference node ids and carry the optional branch label.
//! Field and array order match the graph's deterministic node/edge order.

use serde::Serialize;

use rill_core::flow::{BranchLabel, NodeKind};

use crate::{cfg::Cfg, config::GraphConfig, export::Error};

#[derive(Serialize)]
struct JsonGraph<'a> {
    name: &'a str,
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge>,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    id: usize,
    label: &'a str,
    kind: NodeKind,
}

#[derive(Serialize)]
struct JsonEdge {
    from: usize,
    to: usize,
    label: Option<BranchLabel>,
}

/// Emitter for the JSON graph description.
pub struct JsonExporter<'a> {
    config: &'a GraphConfig,
}

impl<'a> JsonExporter<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// Render the graph as pretty-printed JSON.
    pub fn export(&self, cfg: &Cfg) -> Result<String, Error> {
        let graph = JsonGraph {
            name: &self.config.name,
            nodes: cfg
                .nodes_with_indices()
                .map(|(idx, node)| JsonNode {
                    id: idx.index(),
                    label: node.label(),
                    kind: node.kind(),
                })
                .collect(),
            edges: cfg
                .edges()
                .map(|(source, target, label)| JsonEdge {
                    from: source.index(),
                    to: target.index(),
                    label,
                })
                .collect(),
        };

        let mut text = serde_json::to_string_pretty(&graph)?;
        text.push('\n');
        Ok(text)
    }
}

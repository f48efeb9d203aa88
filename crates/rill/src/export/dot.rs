//! Graphviz DOT emission.
//!
//! Serializes a [`Cfg`] into DOT text: one declaration per node with its
//! label and shape, then one declaration per edge in insertion order. The
//! emitter trusts the builder's invariants and performs no validation of
//! its own; its only job besides formatting is escaping label text so
//! arbitrary source expressions cannot corrupt the output syntax.

use std::fmt::Write as _;

use rill_core::flow::NodeKind;

use crate::{cfg::Cfg, config::GraphConfig, export::Error};

/// Emitter for the DOT graph-description language.
pub struct DotExporter<'a> {
    config: &'a GraphConfig,
}

impl<'a> DotExporter<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// Render the graph as DOT text.
    pub fn export(&self, cfg: &Cfg) -> Result<String, Error> {
        let mut out = String::new();

        writeln!(out, "digraph \"{}\" {{", escape(&self.config.name))?;
        writeln!(out, "    rankdir={};", self.config.rankdir)?;
        writeln!(out)?;

        for (idx, node) in cfg.nodes_with_indices() {
            writeln!(
                out,
                "    node{} [label=\"{}\", shape={}];",
                idx.index(),
                escape(node.label()),
                shape(node.kind()),
            )?;
        }
        writeln!(out)?;

        for (source, target, label) in cfg.edges() {
            match label {
                Some(label) => writeln!(
                    out,
                    "    node{} -> node{} [label=\"{}\"];",
                    source.index(),
                    target.index(),
                    label,
                )?,
                None => writeln!(out, "    node{} -> node{};", source.index(), target.index())?,
            }
        }

        writeln!(out, "}}")?;
        Ok(out)
    }
}

/// DOT shape for a node kind.
///
/// The shapes follow flowchart convention: ellipse terminals, rectangle
/// process boxes, diamond decisions, parallelogram input/output. Junctions
/// render as a bare point.
fn shape(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Terminal => "ellipse",
        NodeKind::Process => "rectangle",
        NodeKind::InputOutput => "parallelogram",
        NodeKind::Decision => "diamond",
        NodeKind::Junction => "point",
    }
}

/// Escape label text for a double-quoted DOT string.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

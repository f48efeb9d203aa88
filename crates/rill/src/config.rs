//! Application configuration.
//!
//! [`AppConfig`] is deserialized from a TOML file by the CLI and passed to
//! [`FlowchartBuilder`](crate::FlowchartBuilder). Every section and field
//! has a default so a missing or partial file still works.

use std::fmt;

use serde::Deserialize;

/// Application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Graph output section
    #[serde(default)]
    pub graph: GraphConfig,

    /// Parser behavior section
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Graph output configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Name of the emitted graph
    #[serde(default = "default_graph_name")]
    pub name: String,

    /// Direction the diagram flows in
    #[serde(default)]
    pub rankdir: Rankdir,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: default_graph_name(),
            rankdir: Rankdir::default(),
        }
    }
}

fn default_graph_name() -> String {
    "flowchart".to_string()
}

/// Parser behavior configuration section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ParserConfig {
    /// Render `input(...)` assignments and `print(...)` calls as
    /// input/output boxes instead of plain statements.
    #[serde(default)]
    pub detect_io: bool,
}

/// Direction the diagram flows in (Graphviz `rankdir`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rankdir {
    /// Top to bottom
    #[default]
    Tb,
    /// Left to right
    Lr,
}

impl Rankdir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rankdir::Tb => "TB",
            Rankdir::Lr => "LR",
        }
    }
}

impl fmt::Display for Rankdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Diagram-box kinds and branch labels for flow graphs.
//!
//! These types describe the *shape vocabulary* of a flowchart: what kind of
//! box a node is drawn as, and how the two outgoing edges of a decision are
//! labeled. They carry no geometry; exporters map them onto their target
//! format.

use std::fmt;

use serde::Serialize;

/// The kind of a flow-graph node, which determines its rendered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Start/stop marker of the whole program.
    Terminal,
    /// A plain statement: assignment or call.
    Process,
    /// An input or output statement.
    InputOutput,
    /// A conditional test with `yes`/`no` branches.
    Decision,
    /// The point where two conditional branches reconverge.
    Junction,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Terminal => write!(f, "terminal"),
            NodeKind::Process => write!(f, "process"),
            NodeKind::InputOutput => write!(f, "input/output"),
            NodeKind::Decision => write!(f, "decision"),
            NodeKind::Junction => write!(f, "junction"),
        }
    }
}

/// Label on the outgoing edge of a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchLabel {
    /// The branch taken when the condition holds.
    Yes,
    /// The branch taken when the condition does not hold.
    No,
}

impl BranchLabel {
    /// The label text as it appears on the rendered edge.
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchLabel::Yes => "yes",
            BranchLabel::No => "no",
        }
    }
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single flow-graph node: a label and the kind of box it is drawn as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    label: String,
    kind: NodeKind,
}

impl FlowNode {
    /// Create a node of the given kind.
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Create a terminal (start/stop) node.
    pub fn terminal(label: impl Into<String>) -> Self {
        Self::new(label, NodeKind::Terminal)
    }

    /// Create a junction node where branches reconverge.
    ///
    /// Junctions carry no label of their own.
    pub fn junction() -> Self {
        Self::new("", NodeKind::Junction)
    }

    /// The node's label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

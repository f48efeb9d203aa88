//! Flow-graph construction.
//!
//! [`Cfg`] is the control-flow graph of a program: one entry node, one exit
//! node, and a box per statement in between. The builder threads a cursor
//! (the node the next edge leaves from) through the statement sequence and
//! recurses into conditional branches, joining them at a junction node.
//!
//! Node indices are assigned in traversal order and edges are recorded in
//! insertion order, so the same program always produces the same graph.

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};

use rill_core::{
    flow::{BranchLabel, FlowNode, NodeKind},
    semantic::{Program, Statement},
};

/// A control-flow graph of a program.
///
/// The graph is acyclic: the source language has no loop construct and
/// conditional branches always reconverge downstream.
#[derive(Debug)]
pub struct Cfg {
    graph: DiGraph<FlowNode, Option<BranchLabel>>,
    entry: NodeIndex,
    exit: NodeIndex,
}

impl Cfg {
    /// Build the flow graph of a program.
    pub fn from_program(program: &Program) -> Self {
        let mut builder = Builder {
            graph: DiGraph::new(),
        };

        let entry = builder.graph.add_node(FlowNode::terminal("start"));
        let (tail, pending) = builder.sequence(program.statements(), entry, None);
        let exit = builder.graph.add_node(FlowNode::terminal("stop"));
        builder.graph.add_edge(tail, exit, pending);

        let cfg = Cfg {
            graph: builder.graph,
            entry,
            exit,
        };
        debug!(
            nodes = cfg.node_count(),
            edges = cfg.edge_count();
            "Flow graph built",
        );
        cfg
    }

    /// The entry node of the whole program.
    pub fn entry(&self) -> NodeIndex {
        self.entry
    }

    /// The exit node of the whole program.
    pub fn exit(&self) -> NodeIndex {
        self.exit
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate nodes with their indices, in id order.
    pub fn nodes_with_indices(&self) -> impl Iterator<Item = (NodeIndex, &FlowNode)> {
        self.graph.node_indices().map(|idx| {
            (
                idx,
                self.graph.node_weight(idx).expect("node index should exist"),
            )
        })
    }

    /// Iterate edges as `(source, target, label)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, Option<BranchLabel>)> + '_ {
        self.graph.edge_indices().map(|idx| {
            let (source, target) = self
                .graph
                .edge_endpoints(idx)
                .expect("edge index should exist");
            let label = self
                .graph
                .edge_weight(idx)
                .expect("edge index should exist");
            (source, target, *label)
        })
    }
}

/// Incremental builder state: the graph accumulator.
struct Builder {
    graph: DiGraph<FlowNode, Option<BranchLabel>>,
}

impl Builder {
    /// Build the subgraph for a statement sequence.
    ///
    /// `cursor` is the node the sequence hangs off; `pending` is a branch
    /// label waiting for the next edge (set when the sequence is the start
    /// of a conditional branch). Returns the tail node and any label still
    /// unconsumed, which happens exactly when the sequence is empty.
    fn sequence(
        &mut self,
        statements: &[Statement],
        mut cursor: NodeIndex,
        mut pending: Option<BranchLabel>,
    ) -> (NodeIndex, Option<BranchLabel>) {
        for statement in statements {
            match statement {
                Statement::Conditional(conditional) => {
                    let decision = self.graph.add_node(FlowNode::new(
                        conditional.condition.clone(),
                        NodeKind::Decision,
                    ));
                    self.graph.add_edge(cursor, decision, pending.take());

                    let (then_tail, then_pending) =
                        self.sequence(&conditional.then_branch, decision, Some(BranchLabel::Yes));
                    let (else_tail, else_pending) =
                        self.sequence(&conditional.else_branch, decision, Some(BranchLabel::No));

                    // Branches reconverge at a junction. An empty branch
                    // contributes the decision node itself as its tail, so
                    // the junction edge still carries the branch label.
                    let merge = self.graph.add_node(FlowNode::junction());
                    self.graph.add_edge(then_tail, merge, then_pending);
                    self.graph.add_edge(else_tail, merge, else_pending);

                    cursor = merge;
                }
                simple => {
                    let node = self.graph.add_node(flow_node(simple));
                    self.graph.add_edge(cursor, node, pending.take());
                    cursor = node;
                }
            }
        }

        (cursor, pending)
    }
}

fn flow_node(statement: &Statement) -> FlowNode {
    let kind = match statement {
        Statement::Input(_) | Statement::Output(_) => NodeKind::InputOutput,
        _ => NodeKind::Process,
    };
    FlowNode::new(statement.label(), kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_core::semantic::{Assignment, Call, Conditional};

    fn assign(target: &str, value: &str) -> Statement {
        Statement::Assignment(Assignment {
            target: target.to_string(),
            value: value.to_string(),
        })
    }

    fn call(text: &str) -> Statement {
        Statement::Call(Call {
            text: text.to_string(),
        })
    }

    fn labeled_edges(cfg: &Cfg) -> Vec<BranchLabel> {
        cfg.edges().filter_map(|(_, _, label)| label).collect()
    }

    #[test]
    fn test_empty_program_links_entry_to_exit() {
        let cfg = Cfg::from_program(&Program::default());

        assert_eq!(cfg.node_count(), 2);
        assert_eq!(cfg.edge_count(), 1);
        let (source, target, label) = cfg.edges().next().unwrap();
        assert_eq!(source, cfg.entry());
        assert_eq!(target, cfg.exit());
        assert!(label.is_none());
    }

    #[test]
    fn test_straight_line_chain() {
        // N statements produce N+2 nodes and N+1 edges, none labeled
        let program = Program::new(vec![assign("x", "1"), assign("y", "2"), call("run()")]);
        let cfg = Cfg::from_program(&program);

        assert_eq!(cfg.node_count(), 5);
        assert_eq!(cfg.edge_count(), 4);
        assert!(labeled_edges(&cfg).is_empty());

        // The chain visits nodes in statement order
        let edges: Vec<_> = cfg.edges().collect();
        for window in edges.windows(2) {
            assert_eq!(window[0].1, window[1].0);
        }
    }

    #[test]
    fn test_single_conditional_shape() {
        // M and K statements per branch: 1 decision + M+K process nodes +
        // 1 junction + entry/exit
        let program = Program::new(vec![Statement::Conditional(Conditional {
            condition: "x > 0".to_string(),
            then_branch: vec![assign("y", "1"), assign("z", "2")],
            else_branch: vec![assign("y", "3")],
        })]);
        let cfg = Cfg::from_program(&program);

        // 1 decision + 3 process + 1 junction + entry/exit
        assert_eq!(cfg.node_count(), 7);
        assert_eq!(cfg.edge_count(), 7);
        assert_eq!(
            labeled_edges(&cfg),
            vec![BranchLabel::Yes, BranchLabel::No]
        );
    }

    #[test]
    fn test_empty_else_links_decision_to_junction() {
        let program = Program::new(vec![Statement::Conditional(Conditional {
            condition: "x > 0".to_string(),
            then_branch: vec![assign("y", "1")],
            else_branch: vec![],
        })]);
        let cfg = Cfg::from_program(&program);

        let decision = cfg
            .nodes_with_indices()
            .find(|(_, node)| node.kind() == NodeKind::Decision)
            .map(|(idx, _)| idx)
            .unwrap();
        let junction = cfg
            .nodes_with_indices()
            .find(|(_, node)| node.kind() == NodeKind::Junction)
            .map(|(idx, _)| idx)
            .unwrap();

        // The `no` edge connects the decision directly to the junction
        assert!(cfg.edges().any(|(source, target, label)| {
            source == decision && target == junction && label == Some(BranchLabel::No)
        }));
    }

    #[test]
    fn test_worked_example_graph() {
        // x = 1 / if x > 0: y = 2 else: y = 3 / print(y)
        let program = Program::new(vec![
            assign("x", "1"),
            Statement::Conditional(Conditional {
                condition: "x > 0".to_string(),
                then_branch: vec![assign("y", "2")],
                else_branch: vec![assign("y", "3")],
            }),
            call("print(y)"),
        ]);
        let cfg = Cfg::from_program(&program);

        assert_eq!(cfg.node_count(), 8);
        assert_eq!(cfg.edge_count(), 8);
        assert_eq!(labeled_edges(&cfg).len(), 2);

        // Node ids follow traversal order
        let labels: Vec<_> = cfg
            .nodes_with_indices()
            .map(|(_, node)| node.label().to_string())
            .collect();
        assert_eq!(
            labels,
            vec!["start", "x = 1", "x > 0", "y = 2", "y = 3", "", "print(y)", "stop"]
        );
    }

    #[test]
    fn test_nested_conditional_is_acyclic() {
        let program = Program::new(vec![Statement::Conditional(Conditional {
            condition: "a".to_string(),
            then_branch: vec![Statement::Conditional(Conditional {
                condition: "b".to_string(),
                then_branch: vec![assign("x", "1")],
                else_branch: vec![],
            })],
            else_branch: vec![assign("x", "2")],
        })]);
        let cfg = Cfg::from_program(&program);

        assert!(!petgraph::algo::is_cyclic_directed(&cfg.graph));
        // Inner junction feeds the outer one
        let junctions: Vec<_> = cfg
            .nodes_with_indices()
            .filter(|(_, node)| node.kind() == NodeKind::Junction)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(junctions.len(), 2);
    }

    #[test]
    fn test_every_non_entry_node_has_incoming_edge() {
        let program = Program::new(vec![
            assign("x", "1"),
            Statement::Conditional(Conditional {
                condition: "x".to_string(),
                then_branch: vec![],
                else_branch: vec![],
            }),
        ]);
        let cfg = Cfg::from_program(&program);

        for (idx, _) in cfg.nodes_with_indices() {
            if idx == cfg.entry() {
                continue;
            }
            assert!(
                cfg.edges().any(|(_, target, _)| target == idx),
                "node {:?} has no incoming edge",
                idx
            );
        }
    }

    #[test]
    fn test_identical_input_builds_identical_graph() {
        let program = Program::new(vec![
            assign("x", "1"),
            Statement::Conditional(Conditional {
                condition: "x > 0".to_string(),
                then_branch: vec![assign("y", "2")],
                else_branch: vec![assign("y", "3")],
            }),
        ]);

        let first = Cfg::from_program(&program);
        let second = Cfg::from_program(&program);

        let edges_of = |cfg: &Cfg| {
            cfg.edges()
                .map(|(s, t, l)| (s.index(), t.index(), l))
                .collect::<Vec<_>>()
        };
        assert_eq!(edges_of(&first), edges_of(&second));
    }
}

//! Rill Core Types and Definitions
//!
//! This crate provides the foundational types for the rill flowchart
//! pipeline. It includes:
//!
//! - **Flow**: diagram-box kinds and branch edge labels ([`flow`] module)
//! - **Semantic**: the statement model produced by the parser and consumed
//!   by the flow-graph builder ([`semantic`] module)

pub mod flow;
pub mod semantic;

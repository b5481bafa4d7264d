//! wf-graph: graph/model layer for the workflow designer.
//!
//! Provides:
//! - Node and edge types with per-kind payloads
//! - The live `Graph` with whole-collection mutations and statistics
//! - A builder for fixed graphs (templates, fixtures)
//! - Structural validation producing errors and warnings
//!
//! # Example
//!
//! ```
//! use wf_graph::{GraphBuilder, NodeKind, Outcome};
//!
//! let mut builder = GraphBuilder::new();
//! let start = builder.add_node("start", NodeKind::Start, 100.0, 100.0);
//! let end = builder.add_node("end", NodeKind::End, 100.0, 300.0);
//! builder.connect(&start, &end);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.stats().nodes, 2);
//! assert_eq!(wf_graph::validate(&graph).outcome(), Outcome::Passed);
//! ```

pub mod builder;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use edge::{Edge, EdgeData, EdgePatch, EdgeStyle, LineShape};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphStats};
pub use node::{
    ApprovalMode, Channel, Node, NodeData, NodeKind, NodePatch, NodePayload, PayloadPatch,
    Priority,
};
pub use validate::{Endpoint, Outcome, ValidationIssue, ValidationReport, validate};

//! Graph-specific error types.

use wf_core::{EdgeId, NodeId};

use crate::node::NodeKind;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph mutation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A node with this id is already on the canvas.
    #[error("Duplicate node id: {id}")]
    DuplicateNodeId { id: NodeId },

    /// An edge with this id is already on the canvas.
    #[error("Duplicate edge id: {id}")]
    DuplicateEdgeId { id: EdgeId },

    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("Edge not found: {id}")]
    EdgeNotFound { id: EdgeId },

    /// A payload patch was built for a different node kind.
    #[error("Node {node} is a {found} node, patch targets {expected}")]
    PayloadKindMismatch {
        node: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A serialized node could not be turned into a typed node.
    #[error("Invalid node {id}: {reason}")]
    InvalidNode { id: NodeId, reason: String },

    #[error(transparent)]
    Core(#[from] wf_core::CoreError),
}

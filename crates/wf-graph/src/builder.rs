//! Incremental graph builder.

use wf_core::{EdgeId, NodeId, Position};

use crate::edge::Edge;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::node::{Node, NodeData, NodeKind, NodePayload};

/// Builder for fixed graphs (built-in templates, test fixtures).
///
/// Nodes get caller-chosen ids, edges are numbered `e1`, `e2`, ...
/// `build()` rejects duplicate ids.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_edge: u32,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the kind's default payload and label.
    pub fn add_node(&mut self, id: impl Into<NodeId>, kind: NodeKind, x: f64, y: f64) -> NodeId {
        self.add_node_with(id, Position::new(x, y), NodeData::default_for(kind))
    }

    /// Add a node with a custom label and payload.
    pub fn add_labeled(
        &mut self,
        id: impl Into<NodeId>,
        label: impl Into<String>,
        payload: NodePayload,
        x: f64,
        y: f64,
    ) -> NodeId {
        self.add_node_with(id, Position::new(x, y), NodeData::new(label, payload))
    }

    pub fn add_node_with(
        &mut self,
        id: impl Into<NodeId>,
        position: Position,
        data: NodeData,
    ) -> NodeId {
        let id = id.into();
        self.nodes.push(Node::new(id.clone(), position, data));
        id
    }

    /// Connect two nodes; endpoints are not checked.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> EdgeId {
        self.connect_labeled(source, target, "")
    }

    pub fn connect_labeled(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        label: impl Into<String>,
    ) -> EdgeId {
        self.next_edge += 1;
        let id = EdgeId::from(format!("e{}", self.next_edge));
        self.edges.push(
            Edge::new(id.clone(), source.clone(), target.clone()).with_label(label),
        );
        id
    }

    /// Set the guard expression of an edge added earlier.
    pub fn condition(&mut self, edge: &EdgeId, condition: impl Into<String>) {
        if let Some(e) = self.edges.iter_mut().find(|e| e.id == *edge) {
            e.data.condition = condition.into();
        }
    }

    pub fn build(self) -> GraphResult<Graph> {
        Graph::from_parts(self.nodes, self.edges)
    }
}

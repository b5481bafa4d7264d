//! The live workflow graph.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;
use wf_core::{EdgeId, NodeId, Position};

use crate::edge::{Edge, EdgePatch};
use crate::error::{GraphError, GraphResult};
use crate::node::{Node, NodeKind, NodePatch};

/// Counts shown in the designer's status panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub by_kind: BTreeMap<NodeKind, usize>,
}

impl GraphStats {
    pub fn count(&self, kind: NodeKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Ordered nodes and edges of the canvas.
///
/// Every mutation swaps in a whole new collection; nothing is patched in place.
/// Node and edge ids are unique, but edge endpoints are not checked against
/// the node set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from raw collections, rejecting duplicate ids.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphResult<Self> {
        let mut graph = Self::new();
        graph.replace_nodes(nodes)?;
        graph.replace_edges(edges)?;
        Ok(graph)
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn add_node(&mut self, node: Node) -> GraphResult<()> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNodeId { id: node.id });
        }
        debug!(node = %node.id, kind = %node.kind(), "add node");
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        self.nodes = nodes;
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if self.edge(&edge.id).is_some() {
            return Err(GraphError::DuplicateEdgeId { id: edge.id });
        }
        debug!(edge = %edge.id, source = %edge.source, target = %edge.target, "add edge");
        let mut edges = self.edges.clone();
        edges.push(edge);
        self.edges = edges;
        Ok(())
    }

    pub fn replace_nodes(&mut self, nodes: Vec<Node>) -> GraphResult<()> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(&node.id) {
                return Err(GraphError::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }
        self.nodes = nodes;
        Ok(())
    }

    pub fn replace_edges(&mut self, edges: Vec<Edge>) -> GraphResult<()> {
        let mut seen = HashSet::new();
        for edge in &edges {
            if !seen.insert(&edge.id) {
                return Err(GraphError::DuplicateEdgeId {
                    id: edge.id.clone(),
                });
            }
        }
        self.edges = edges;
        Ok(())
    }

    /// Remove a node together with every edge touching it.
    ///
    /// Returns the removed node and the cascaded edges.
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<(Node, Vec<Edge>)> {
        let node = self
            .node(id)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound { id: id.clone() })?;

        self.nodes = self.nodes.iter().filter(|n| n.id != *id).cloned().collect();
        let (removed, kept): (Vec<Edge>, Vec<Edge>) =
            self.edges.iter().cloned().partition(|e| e.touches(id));
        self.edges = kept;

        debug!(node = %id, cascaded = removed.len(), "remove node");
        Ok((node, removed))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edge(id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound { id: id.clone() })?;
        self.edges = self.edges.iter().filter(|e| e.id != *id).cloned().collect();
        debug!(edge = %id, "remove edge");
        Ok(edge)
    }

    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> GraphResult<()> {
        let current = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound { id: id.clone() })?;
        let patched = current.patched(patch)?;
        self.nodes = self
            .nodes
            .iter()
            .map(|n| if n.id == *id { patched.clone() } else { n.clone() })
            .collect();
        Ok(())
    }

    pub fn update_edge(&mut self, id: &EdgeId, patch: &EdgePatch) -> GraphResult<()> {
        let patched = self
            .edge(id)
            .ok_or_else(|| GraphError::EdgeNotFound { id: id.clone() })?
            .patched(patch);
        self.edges = self
            .edges
            .iter()
            .map(|e| if e.id == *id { patched.clone() } else { e.clone() })
            .collect();
        Ok(())
    }

    pub fn move_node(&mut self, id: &NodeId, position: Position) -> GraphResult<()> {
        let position = position.ensure_finite()?;
        if !self.contains_node(id) {
            return Err(GraphError::NodeNotFound { id: id.clone() });
        }
        self.nodes = self
            .nodes
            .iter()
            .map(|n| {
                let mut n = n.clone();
                if n.id == *id {
                    n.position = position;
                }
                n
            })
            .collect();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.edges = Vec::new();
    }

    /// Recomputed on every call.
    pub fn stats(&self) -> GraphStats {
        let mut by_kind = BTreeMap::new();
        for node in &self.nodes {
            *by_kind.entry(node.kind()).or_insert(0) += 1;
        }
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            by_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;

    fn node(id: &str, kind: NodeKind) -> Node {
        Node::new(id.into(), Position::ORIGIN, NodeData::default_for(kind))
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut graph = Graph::new();
        graph.add_node(node("a", NodeKind::Start)).unwrap();
        let err = graph.add_node(node("a", NodeKind::End)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNodeId { .. }));
        assert_eq!(graph.nodes().len(), 1);
    }

    #[test]
    fn edges_may_dangle() {
        let mut graph = Graph::new();
        graph
            .add_edge(Edge::new("e".into(), "ghost".into(), "nowhere".into()))
            .unwrap();
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn stats_by_kind() {
        let graph = Graph::from_parts(
            vec![
                node("s", NodeKind::Start),
                node("t1", NodeKind::Task),
                node("t2", NodeKind::Task),
            ],
            vec![Edge::new("e".into(), "s".into(), "t1".into())],
        )
        .unwrap();
        let stats = graph.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.count(NodeKind::Task), 2);
        assert_eq!(stats.count(NodeKind::End), 0);
    }

    #[test]
    fn move_missing_node_fails() {
        let mut graph = Graph::new();
        assert!(graph.move_node(&"x".into(), Position::new(1.0, 1.0)).is_err());
    }
}

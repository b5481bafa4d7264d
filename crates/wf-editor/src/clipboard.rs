//! Single-node clipboard.

use wf_core::IdGenerator;
use wf_graph::Node;

/// Holds at most one copied node. Pasting does not empty it.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    node: Option<Node>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, node: &Node) {
        self.node = Some(node.clone());
    }

    pub fn peek(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// A new node with a fresh id, shifted by `offset`, same payload.
    pub fn paste(&self, ids: &mut IdGenerator, offset: (f64, f64)) -> Option<Node> {
        let source = self.node.as_ref()?;
        let mut node = source.clone();
        node.id = ids.next_node_id();
        node.position = source.position.translate(offset.0, offset.1);
        Some(node)
    }
}

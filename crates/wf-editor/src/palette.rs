//! Node palette and palette-to-canvas drag state.

use wf_core::{IdGenerator, NodeId, Position};
use wf_graph::{Node, NodeData, NodeKind};

/// One draggable palette item.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub kind: NodeKind,
    pub label: String,
}

impl PaletteEntry {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: kind.default_label().to_string(),
        }
    }

    /// User-defined placeholder step.
    pub fn custom(label: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Generic,
            label: label.into(),
        }
    }
}

/// Built-in palette: fixed start/end followed by the typed steps.
pub fn palette() -> Vec<PaletteEntry> {
    [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Task,
        NodeKind::Approval,
        NodeKind::Condition,
        NodeKind::Parallel,
        NodeKind::Notification,
        NodeKind::Timer,
    ]
    .into_iter()
    .map(PaletteEntry::new)
    .collect()
}

/// Node being dragged from the palette, not yet on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNode {
    pub id: NodeId,
    pub data: NodeData,
}

impl PendingNode {
    pub fn from_entry(entry: &PaletteEntry, ids: &mut IdGenerator) -> Self {
        let mut data = NodeData::default_for(entry.kind);
        data.label = entry.label.clone();
        Self {
            id: ids.next_node_id(),
            data,
        }
    }

    pub fn place(self, position: Position) -> Node {
        Node::new(self.id, position, self.data)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    pending: Option<PendingNode>,
    /// Last pointer position in screen space.
    pointer: Option<Position>,
}

impl DragSession {
    pub fn begin(&mut self, pending: PendingNode) {
        self.pending = Some(pending);
        self.pointer = None;
    }

    pub fn pointer_moved(&mut self, screen: Position) {
        if self.pending.is_some() {
            self.pointer = Some(screen);
        }
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingNode> {
        self.pending.as_ref()
    }

    /// Hand out the pending node and where the pointer was last seen.
    pub fn take(&mut self) -> Option<(PendingNode, Option<Position>)> {
        let pending = self.pending.take()?;
        Some((pending, self.pointer.take()))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_graph::{NodePayload, Priority};

    #[test]
    fn palette_covers_fixed_and_typed_kinds() {
        let entries = palette();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].kind, NodeKind::Start);
        assert!(entries.iter().all(|e| e.kind != NodeKind::Generic));
    }

    #[test]
    fn new_task_defaults() {
        let pending = PendingNode::from_entry(&PaletteEntry::new(NodeKind::Task), &mut IdGenerator::new());
        assert_eq!(
            pending.data.payload,
            NodePayload::Task {
                assignee: None,
                priority: Priority::Medium
            }
        );
    }

    #[test]
    fn pointer_ignored_without_drag() {
        let mut drag = DragSession::default();
        drag.pointer_moved(Position::new(1.0, 1.0));
        assert!(drag.take().is_none());
    }
}

//! Single selection and the config forms it opens.

use wf_core::{EdgeId, NodeId};
use wf_graph::{
    Edge, EdgePatch, Graph, LineShape, Node, NodeKind, NodePatch, NodePayload, PayloadPatch,
};

/// Editable copy of a node's data, shown in the node config panel.
///
/// `fields` carries the node's own payload variant, so the panel renders the
/// field set of that kind only.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    pub kind: NodeKind,
    pub label: String,
    pub description: String,
    pub class: String,
    pub fields: NodePayload,
}

impl NodeForm {
    pub fn from_node(node: &Node) -> Self {
        Self {
            kind: node.kind(),
            label: node.data.label.clone(),
            description: node.data.description.clone().unwrap_or_default(),
            class: node.class.clone().unwrap_or_default(),
            fields: node.data.payload.clone(),
        }
    }

    /// Names of the kind-specific inputs the panel shows.
    pub fn visible_fields(&self) -> &'static [&'static str] {
        match self.fields {
            NodePayload::Start | NodePayload::End => &[],
            NodePayload::Task { .. } => &["assignee", "priority"],
            NodePayload::Approval { .. } => &["approver", "approvalMode"],
            NodePayload::Condition { .. } => &["expression"],
            NodePayload::Parallel { .. } => &["branches"],
            NodePayload::Notification { .. } => &["channel", "recipients"],
            NodePayload::Timer { .. } => &["delay"],
            NodePayload::Generic { .. } => &["fields"],
        }
    }

    /// Patch carrying every field of the form.
    pub fn to_patch(&self) -> NodePatch {
        let fields = match &self.fields {
            NodePayload::Start | NodePayload::End => None,
            NodePayload::Task { assignee, priority } => Some(PayloadPatch::Task {
                assignee: Some(assignee.clone().unwrap_or_default()),
                priority: Some(*priority),
            }),
            NodePayload::Approval { approver, mode } => Some(PayloadPatch::Approval {
                approver: Some(approver.clone().unwrap_or_default()),
                mode: Some(*mode),
            }),
            NodePayload::Condition { expression } => Some(PayloadPatch::Condition {
                expression: Some(expression.clone()),
            }),
            NodePayload::Parallel { branches } => Some(PayloadPatch::Parallel {
                branches: Some(*branches),
            }),
            NodePayload::Notification {
                channel,
                recipients,
            } => Some(PayloadPatch::Notification {
                channel: Some(*channel),
                recipients: Some(recipients.clone()),
            }),
            NodePayload::Timer { delay_seconds } => Some(PayloadPatch::Timer {
                delay_seconds: Some(*delay_seconds),
            }),
            NodePayload::Generic { fields } => Some(PayloadPatch::Generic {
                fields: fields.clone(),
            }),
        };
        NodePatch {
            label: Some(self.label.clone()),
            description: Some(self.description.clone()),
            class: Some(self.class.clone()),
            fields,
        }
    }
}

/// Editable copy of an edge, shown in the edge config panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeForm {
    pub label: String,
    pub condition: String,
    pub description: String,
    pub shape: LineShape,
    pub animated: bool,
    pub color: String,
    pub width: f64,
}

impl EdgeForm {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            label: edge.label.clone(),
            condition: edge.data.condition.clone(),
            description: edge.data.description.clone(),
            shape: edge.style.shape,
            animated: edge.style.animated,
            color: edge.style.stroke.color.clone(),
            width: edge.style.stroke.width,
        }
    }

    pub fn to_patch(&self) -> EdgePatch {
        EdgePatch {
            label: Some(self.label.clone()),
            condition: Some(self.condition.clone()),
            description: Some(self.description.clone()),
            shape: Some(self.shape),
            animated: Some(self.animated),
            color: Some(self.color.clone()),
            width: Some(self.width),
        }
    }
}

/// Idle, or exactly one node or edge with its open config form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Idle,
    Node {
        id: NodeId,
        form: NodeForm,
    },
    Edge {
        id: EdgeId,
        form: EdgeForm,
    },
}

impl Selection {
    pub fn node(node: &Node) -> Self {
        Selection::Node {
            id: node.id.clone(),
            form: NodeForm::from_node(node),
        }
    }

    pub fn edge(edge: &Edge) -> Self {
        Selection::Edge {
            id: edge.id.clone(),
            form: EdgeForm::from_edge(edge),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Selection::Node { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn edge_id(&self) -> Option<&EdgeId> {
        match self {
            Selection::Edge { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn node_form_mut(&mut self) -> Option<&mut NodeForm> {
        match self {
            Selection::Node { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn edge_form_mut(&mut self) -> Option<&mut EdgeForm> {
        match self {
            Selection::Edge { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Still pointing at something that exists in `graph`?
    pub fn is_valid_in(&self, graph: &Graph) -> bool {
        match self {
            Selection::Idle => true,
            Selection::Node { id, .. } => graph.contains_node(id),
            Selection::Edge { id, .. } => graph.edge(id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::Position;
    use wf_graph::{NodeData, Priority};

    #[test]
    fn form_shows_kind_fields_only() {
        let node = Node::new(
            "t".into(),
            Position::ORIGIN,
            NodeData::default_for(NodeKind::Task),
        );
        let form = NodeForm::from_node(&node);
        assert_eq!(form.visible_fields(), &["assignee", "priority"]);

        let timer = Node::new(
            "w".into(),
            Position::ORIGIN,
            NodeData::default_for(NodeKind::Timer),
        );
        assert_eq!(NodeForm::from_node(&timer).visible_fields(), &["delay"]);
    }

    #[test]
    fn form_patch_roundtrips_through_node() {
        let node = Node::new(
            "t".into(),
            Position::ORIGIN,
            NodeData::default_for(NodeKind::Task),
        );
        let mut form = NodeForm::from_node(&node);
        form.label = "Review".into();
        form.fields = NodePayload::Task {
            assignee: Some("bob".into()),
            priority: Priority::High,
        };
        let patched = node.patched(&form.to_patch()).unwrap();
        assert_eq!(patched.label(), "Review");
        assert_eq!(NodeForm::from_node(&patched), form);
    }

    #[test]
    fn selection_accessors() {
        let edge = Edge::new("e".into(), "a".into(), "b".into());
        let selection = Selection::edge(&edge);
        assert_eq!(selection.edge_id().map(|id| id.as_str()), Some("e"));
        assert!(selection.node_id().is_none());
        assert!(!selection.is_idle());
    }
}

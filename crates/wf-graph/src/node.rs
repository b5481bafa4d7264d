//! Workflow nodes and their per-kind payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wf_core::{NodeId, Position};

use crate::error::{GraphError, GraphResult};

/// Kind of workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Task,
    Approval,
    Condition,
    Parallel,
    Notification,
    Timer,
    Generic,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Task,
        NodeKind::Approval,
        NodeKind::Condition,
        NodeKind::Parallel,
        NodeKind::Notification,
        NodeKind::Timer,
        NodeKind::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Task => "task",
            NodeKind::Approval => "approval",
            NodeKind::Condition => "condition",
            NodeKind::Parallel => "parallel",
            NodeKind::Notification => "notification",
            NodeKind::Timer => "timer",
            NodeKind::Generic => "generic",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::End => "End",
            NodeKind::Task => "Task",
            NodeKind::Approval => "Approval",
            NodeKind::Condition => "Condition",
            NodeKind::Parallel => "Parallel",
            NodeKind::Notification => "Notification",
            NodeKind::Timer => "Timer",
            NodeKind::Generic => "Node",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    /// Any single approver suffices.
    #[default]
    Any,
    /// Every approver must approve.
    All,
    Sequential,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Email,
    Sms,
    Webhook,
    Im,
}

/// Kind-specific fields. Only the fields of the node's own kind exist.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Start,
    End,
    Task {
        assignee: Option<String>,
        priority: Priority,
    },
    Approval {
        approver: Option<String>,
        mode: ApprovalMode,
    },
    Condition {
        expression: String,
    },
    Parallel {
        branches: u32,
    },
    Notification {
        channel: Channel,
        recipients: Vec<String>,
    },
    Timer {
        delay_seconds: u64,
    },
    Generic {
        fields: BTreeMap<String, Value>,
    },
}

impl NodePayload {
    /// Payload a freshly dropped node starts with.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => NodePayload::Start,
            NodeKind::End => NodePayload::End,
            NodeKind::Task => NodePayload::Task {
                assignee: None,
                priority: Priority::Medium,
            },
            NodeKind::Approval => NodePayload::Approval {
                approver: None,
                mode: ApprovalMode::Any,
            },
            NodeKind::Condition => NodePayload::Condition {
                expression: String::new(),
            },
            NodeKind::Parallel => NodePayload::Parallel { branches: 2 },
            NodeKind::Notification => NodePayload::Notification {
                channel: Channel::Email,
                recipients: Vec::new(),
            },
            NodeKind::Timer => NodePayload::Timer { delay_seconds: 0 },
            NodeKind::Generic => NodePayload::Generic {
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Start => NodeKind::Start,
            NodePayload::End => NodeKind::End,
            NodePayload::Task { .. } => NodeKind::Task,
            NodePayload::Approval { .. } => NodeKind::Approval,
            NodePayload::Condition { .. } => NodeKind::Condition,
            NodePayload::Parallel { .. } => NodeKind::Parallel,
            NodePayload::Notification { .. } => NodeKind::Notification,
            NodePayload::Timer { .. } => NodeKind::Timer,
            NodePayload::Generic { .. } => NodeKind::Generic,
        }
    }
}

/// Display data shared by every kind plus the kind payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub label: String,
    pub description: Option<String>,
    pub payload: NodePayload,
}

impl NodeData {
    pub fn new(label: impl Into<String>, payload: NodePayload) -> Self {
        Self {
            label: label.into(),
            description: None,
            payload,
        }
    }

    pub fn default_for(kind: NodeKind) -> Self {
        Self::new(kind.default_label(), NodePayload::default_for(kind))
    }
}

/// A step on the workflow canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
    /// Decorative CSS class carried through for the canvas renderer.
    pub class: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, position: Position, data: NodeData) -> Self {
        Self {
            id,
            position,
            data,
            class: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.payload.kind()
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    /// Shallow merge: fields set in the patch overwrite, the rest is kept.
    pub fn patched(&self, patch: &NodePatch) -> GraphResult<Node> {
        let mut node = self.clone();
        if let Some(label) = &patch.label {
            node.data.label = label.clone();
        }
        if let Some(description) = &patch.description {
            node.data.description = non_empty(description);
        }
        if let Some(class) = &patch.class {
            node.class = non_empty(class);
        }
        if let Some(fields) = &patch.fields {
            node.data.payload = fields.apply(&self.id, &self.data.payload)?;
        }
        Ok(node)
    }
}

/// Partial update of a node, produced by the config panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    /// Empty string clears the description.
    pub description: Option<String>,
    pub class: Option<String>,
    pub fields: Option<PayloadPatch>,
}

/// Kind-specific part of a [`NodePatch`]. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadPatch {
    Task {
        /// Empty string unassigns.
        assignee: Option<String>,
        priority: Option<Priority>,
    },
    Approval {
        approver: Option<String>,
        mode: Option<ApprovalMode>,
    },
    Condition {
        expression: Option<String>,
    },
    Parallel {
        branches: Option<u32>,
    },
    Notification {
        channel: Option<Channel>,
        recipients: Option<Vec<String>>,
    },
    Timer {
        delay_seconds: Option<u64>,
    },
    Generic {
        fields: BTreeMap<String, Value>,
    },
}

impl PayloadPatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            PayloadPatch::Task { .. } => NodeKind::Task,
            PayloadPatch::Approval { .. } => NodeKind::Approval,
            PayloadPatch::Condition { .. } => NodeKind::Condition,
            PayloadPatch::Parallel { .. } => NodeKind::Parallel,
            PayloadPatch::Notification { .. } => NodeKind::Notification,
            PayloadPatch::Timer { .. } => NodeKind::Timer,
            PayloadPatch::Generic { .. } => NodeKind::Generic,
        }
    }

    fn apply(&self, node: &NodeId, current: &NodePayload) -> GraphResult<NodePayload> {
        let mut next = current.clone();
        match (self, &mut next) {
            (
                PayloadPatch::Task { assignee, priority },
                NodePayload::Task {
                    assignee: cur_assignee,
                    priority: cur_priority,
                },
            ) => {
                if let Some(assignee) = assignee {
                    *cur_assignee = non_empty(assignee);
                }
                if let Some(priority) = priority {
                    *cur_priority = *priority;
                }
            }
            (
                PayloadPatch::Approval { approver, mode },
                NodePayload::Approval {
                    approver: cur_approver,
                    mode: cur_mode,
                },
            ) => {
                if let Some(approver) = approver {
                    *cur_approver = non_empty(approver);
                }
                if let Some(mode) = mode {
                    *cur_mode = *mode;
                }
            }
            (
                PayloadPatch::Condition { expression },
                NodePayload::Condition {
                    expression: cur_expression,
                },
            ) => {
                if let Some(expression) = expression {
                    *cur_expression = expression.clone();
                }
            }
            (
                PayloadPatch::Parallel { branches },
                NodePayload::Parallel {
                    branches: cur_branches,
                },
            ) => {
                if let Some(branches) = branches {
                    *cur_branches = *branches;
                }
            }
            (
                PayloadPatch::Notification {
                    channel,
                    recipients,
                },
                NodePayload::Notification {
                    channel: cur_channel,
                    recipients: cur_recipients,
                },
            ) => {
                if let Some(channel) = channel {
                    *cur_channel = *channel;
                }
                if let Some(recipients) = recipients {
                    *cur_recipients = recipients.clone();
                }
            }
            (
                PayloadPatch::Timer { delay_seconds },
                NodePayload::Timer {
                    delay_seconds: cur_delay,
                },
            ) => {
                if let Some(delay) = delay_seconds {
                    *cur_delay = *delay;
                }
            }
            (
                PayloadPatch::Generic { fields },
                NodePayload::Generic {
                    fields: cur_fields,
                },
            ) => {
                cur_fields.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            (patch, payload) => {
                return Err(GraphError::PayloadKindMismatch {
                    node: node.clone(),
                    expected: patch.kind(),
                    found: payload.kind(),
                });
            }
        }
        Ok(next)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Wire format: `{ id, type, position, data: { label, description?, ..fields }, class? }`.

#[derive(Serialize, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct TaskFields {
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    priority: Priority,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ApprovalFields {
    #[serde(default)]
    approver: Option<String>,
    #[serde(default)]
    approval_mode: ApprovalMode,
}

#[derive(Serialize, Deserialize, Default)]
struct ConditionFields {
    #[serde(default)]
    expression: String,
}

#[derive(Serialize, Deserialize)]
struct ParallelFields {
    #[serde(default = "default_branches")]
    branches: u32,
}

fn default_branches() -> u32 {
    2
}

#[derive(Serialize, Deserialize, Default)]
struct NotificationFields {
    #[serde(default)]
    channel: Channel,
    #[serde(default)]
    recipients: Vec<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct TimerFields {
    /// Seconds.
    #[serde(default)]
    delay: u64,
}

const COMMON_KEYS: [&str; 2] = ["label", "description"];

impl TryFrom<RawNode> for Node {
    type Error = GraphError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let invalid = |e: serde_json::Error| GraphError::InvalidNode {
            id: raw.id.clone(),
            reason: e.to_string(),
        };
        let label = match raw.data.get("label") {
            Some(Value::String(label)) => label.clone(),
            _ => raw.kind.default_label().to_string(),
        };
        let description = raw
            .data
            .get("description")
            .and_then(Value::as_str)
            .and_then(non_empty);

        let fields = Value::Object(raw.data.clone());
        let payload = match raw.kind {
            NodeKind::Start => NodePayload::Start,
            NodeKind::End => NodePayload::End,
            NodeKind::Task => {
                let f: TaskFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Task {
                    assignee: f.assignee.as_deref().and_then(non_empty),
                    priority: f.priority,
                }
            }
            NodeKind::Approval => {
                let f: ApprovalFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Approval {
                    approver: f.approver.as_deref().and_then(non_empty),
                    mode: f.approval_mode,
                }
            }
            NodeKind::Condition => {
                let f: ConditionFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Condition {
                    expression: f.expression,
                }
            }
            NodeKind::Parallel => {
                let f: ParallelFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Parallel {
                    branches: f.branches,
                }
            }
            NodeKind::Notification => {
                let f: NotificationFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Notification {
                    channel: f.channel,
                    recipients: f.recipients,
                }
            }
            NodeKind::Timer => {
                let f: TimerFields = serde_json::from_value(fields).map_err(invalid)?;
                NodePayload::Timer {
                    delay_seconds: f.delay,
                }
            }
            NodeKind::Generic => NodePayload::Generic {
                fields: raw
                    .data
                    .iter()
                    .filter(|(k, _)| !COMMON_KEYS.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            },
        };

        Ok(Node {
            id: raw.id,
            position: raw.position.ensure_finite()?,
            data: NodeData {
                label,
                description,
                payload,
            },
            class: raw.class,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let kind = node.kind();
        let mut data = Map::new();
        data.insert("label".into(), Value::String(node.data.label));
        if let Some(description) = node.data.description {
            data.insert("description".into(), Value::String(description));
        }

        let opt = |s: Option<String>| s.map(Value::String).unwrap_or(Value::Null);
        match node.data.payload {
            NodePayload::Start | NodePayload::End => {}
            NodePayload::Task { assignee, priority } => {
                data.insert("assignee".into(), opt(assignee));
                data.insert("priority".into(), enum_value(priority));
            }
            NodePayload::Approval { approver, mode } => {
                data.insert("approver".into(), opt(approver));
                data.insert("approvalMode".into(), enum_value(mode));
            }
            NodePayload::Condition { expression } => {
                data.insert("expression".into(), Value::String(expression));
            }
            NodePayload::Parallel { branches } => {
                data.insert("branches".into(), Value::from(branches));
            }
            NodePayload::Notification {
                channel,
                recipients,
            } => {
                data.insert("channel".into(), enum_value(channel));
                data.insert(
                    "recipients".into(),
                    Value::Array(recipients.into_iter().map(Value::String).collect()),
                );
            }
            NodePayload::Timer { delay_seconds } => {
                data.insert("delay".into(), Value::from(delay_seconds));
            }
            NodePayload::Generic { fields } => {
                for (k, v) in fields {
                    data.entry(k).or_insert(v);
                }
            }
        }

        RawNode {
            id: node.id,
            kind,
            position: node.position,
            data,
            class: node.class,
        }
    }
}

/// Unit enums serialize to plain strings.
fn enum_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

//! Built-in workflow templates.

use std::fmt;
use std::str::FromStr;

use wf_graph::{
    ApprovalMode, Channel, Graph, GraphBuilder, NodeKind, NodePayload, Priority,
};

use crate::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Approval,
    Parallel,
    Notification,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::Approval,
        TemplateId::Parallel,
        TemplateId::Notification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Approval => "approval",
            TemplateId::Parallel => "parallel",
            TemplateId::Notification => "notification",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TemplateId::Approval => "Approval flow",
            TemplateId::Parallel => "Parallel processing",
            TemplateId::Notification => "Notification flow",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateId::Approval => "Submit a request, route it through approval, branch on the result",
            TemplateId::Parallel => "Fan out into concurrent tasks and join before finishing",
            TemplateId::Notification => "Do some work, notify recipients, wait, then finish",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ProjectError::UnknownTemplate { id: s.to_string() })
    }
}

/// Build the fixed node/edge set of a template.
pub fn build_template(id: TemplateId) -> ProjectResult<Graph> {
    let graph = match id {
        TemplateId::Approval => approval(),
        TemplateId::Parallel => parallel(),
        TemplateId::Notification => notification(),
    }
    .build()?;
    Ok(graph)
}

/// Canvas a new designer session opens with: start -> task -> end.
pub fn seed_graph() -> ProjectResult<Graph> {
    let mut b = GraphBuilder::new();
    let start = b.add_node("start", NodeKind::Start, 250.0, 50.0);
    let task = b.add_node("task", NodeKind::Task, 250.0, 150.0);
    let end = b.add_node("end", NodeKind::End, 250.0, 250.0);
    b.connect(&start, &task);
    b.connect(&task, &end);
    Ok(b.build()?)
}

fn approval() -> GraphBuilder {
    let mut b = GraphBuilder::new();
    let start = b.add_labeled("start", "Start", NodePayload::Start, 250.0, 50.0);
    let submit = b.add_labeled(
        "submit",
        "Submit request",
        NodePayload::Task {
            assignee: Some("requester".into()),
            priority: Priority::Medium,
        },
        250.0,
        150.0,
    );
    let review = b.add_labeled(
        "review",
        "Manager approval",
        NodePayload::Approval {
            approver: Some("manager".into()),
            mode: ApprovalMode::Any,
        },
        250.0,
        250.0,
    );
    let decide = b.add_labeled(
        "decide",
        "Approved?",
        NodePayload::Condition {
            expression: "approval.result == 'approved'".into(),
        },
        250.0,
        350.0,
    );
    let done = b.add_labeled(
        "process",
        "Process request",
        NodePayload::Task {
            assignee: None,
            priority: Priority::High,
        },
        100.0,
        450.0,
    );
    let reject = b.add_labeled(
        "notify-reject",
        "Notify rejection",
        NodePayload::Notification {
            channel: Channel::Email,
            recipients: vec!["requester".into()],
        },
        400.0,
        450.0,
    );
    let end = b.add_node("end", NodeKind::End, 250.0, 550.0);

    b.connect(&start, &submit);
    b.connect(&submit, &review);
    b.connect(&review, &decide);
    let yes = b.connect_labeled(&decide, &done, "approved");
    b.condition(&yes, "approval.result == 'approved'");
    let no = b.connect_labeled(&decide, &reject, "rejected");
    b.condition(&no, "approval.result != 'approved'");
    b.connect(&done, &end);
    b.connect(&reject, &end);
    b
}

fn parallel() -> GraphBuilder {
    let mut b = GraphBuilder::new();
    let start = b.add_node("start", NodeKind::Start, 250.0, 50.0);
    let split = b.add_labeled(
        "split",
        "Split",
        NodePayload::Parallel { branches: 3 },
        250.0,
        150.0,
    );
    let branches: Vec<_> = ["Collect data", "Run checks", "Prepare report"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            b.add_labeled(
                format!("branch-{}", i + 1),
                *label,
                NodePayload::Task {
                    assignee: None,
                    priority: Priority::Medium,
                },
                50.0 + 200.0 * i as f64,
                250.0,
            )
        })
        .collect();
    let end = b.add_node("end", NodeKind::End, 250.0, 350.0);

    b.connect(&start, &split);
    for branch in &branches {
        b.connect(&split, branch);
        b.connect(branch, &end);
    }
    b
}

fn notification() -> GraphBuilder {
    let mut b = GraphBuilder::new();
    let start = b.add_node("start", NodeKind::Start, 250.0, 50.0);
    let work = b.add_labeled(
        "work",
        "Handle ticket",
        NodePayload::Task {
            assignee: Some("support".into()),
            priority: Priority::Medium,
        },
        250.0,
        150.0,
    );
    let notify = b.add_labeled(
        "notify",
        "Notify customer",
        NodePayload::Notification {
            channel: Channel::Im,
            recipients: vec!["customer".into()],
        },
        250.0,
        250.0,
    );
    let wait = b.add_labeled(
        "wait",
        "Wait for reply",
        NodePayload::Timer {
            delay_seconds: 3600,
        },
        250.0,
        350.0,
    );
    let end = b.add_node("end", NodeKind::End, 250.0, 450.0);

    b.connect(&start, &work);
    b.connect(&work, &notify);
    b.connect(&notify, &wait);
    b.connect(&wait, &end);
    b
}

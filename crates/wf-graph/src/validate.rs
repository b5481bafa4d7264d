//! On-demand structural validation of a workflow graph.

use std::collections::HashSet;
use std::fmt;

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Bfs;
use wf_core::{EdgeId, NodeId};

use crate::graph::Graph;
use crate::node::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

/// A single finding. Whether it is an error or a warning is decided by the
/// list it lands in.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Workflow has no nodes")]
    NoNodes,

    #[error("Workflow has no start node")]
    MissingStart,

    #[error("Workflow has {count} start nodes")]
    MultipleStarts { count: usize },

    #[error("Workflow has no end node")]
    MissingEnd,

    #[error("Workflow has {count} end nodes")]
    MultipleEnds { count: usize },

    #[error("Edge {edge} references missing {endpoint} node '{node}'")]
    DanglingEdge {
        edge: EdgeId,
        endpoint: Endpoint,
        node: NodeId,
    },

    #[error("Nodes not connected to any edge: {}", labels.join(", "))]
    OrphanNodes { labels: Vec<String> },

    #[error("Nodes unreachable from the start node: {}", labels.join(", "))]
    UnreachableNodes { labels: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    PassedWithWarnings,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn outcome(&self) -> Outcome {
        if !self.errors.is_empty() {
            Outcome::Failed
        } else if !self.warnings.is_empty() {
            Outcome::PassedWithWarnings
        } else {
            Outcome::Passed
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable multi-line summary for notices and the CLI.
    pub fn summary(&self) -> String {
        let mut out = match self.outcome() {
            Outcome::Passed => return "Validation passed".to_string(),
            Outcome::PassedWithWarnings => "Validation passed with warnings".to_string(),
            Outcome::Failed => "Validation failed".to_string(),
        };
        for error in &self.errors {
            out.push_str(&format!("\n  error: {}", error));
        }
        for warning in &self.warnings {
            out.push_str(&format!("\n  warning: {}", warning));
        }
        out
    }
}

/// Run every structural check against `graph`. Never mutates it.
pub fn validate(graph: &Graph) -> ValidationReport {
    let mut report = ValidationReport::default();
    let nodes = graph.nodes();

    if nodes.is_empty() {
        report.errors.push(ValidationIssue::NoNodes);
        return report;
    }

    let starts: Vec<&Node> = nodes.iter().filter(|n| n.kind() == NodeKind::Start).collect();
    match starts.len() {
        0 => report.errors.push(ValidationIssue::MissingStart),
        1 => {}
        count => report
            .warnings
            .push(ValidationIssue::MultipleStarts { count }),
    }

    let end_count = nodes.iter().filter(|n| n.kind() == NodeKind::End).count();
    match end_count {
        0 => report.errors.push(ValidationIssue::MissingEnd),
        1 => {}
        count => report.warnings.push(ValidationIssue::MultipleEnds { count }),
    }

    let node_ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
    for edge in graph.edges() {
        for (endpoint, node) in [(Endpoint::Source, &edge.source), (Endpoint::Target, &edge.target)]
        {
            if !node_ids.contains(node) {
                report.errors.push(ValidationIssue::DanglingEdge {
                    edge: edge.id.clone(),
                    endpoint,
                    node: node.clone(),
                });
            }
        }
    }

    let touched: HashSet<&NodeId> = graph
        .edges()
        .iter()
        .flat_map(|e| [&e.source, &e.target])
        .collect();
    let orphans: Vec<String> = nodes
        .iter()
        .filter(|n| !touched.contains(&n.id))
        .map(|n| n.label().to_string())
        .collect();
    if !orphans.is_empty() {
        report
            .warnings
            .push(ValidationIssue::OrphanNodes { labels: orphans });
    }

    if let [start] = starts.as_slice() {
        let unreachable = unreachable_from(graph, &start.id, &touched);
        if !unreachable.is_empty() {
            report.warnings.push(ValidationIssue::UnreachableNodes {
                labels: unreachable,
            });
        }
    }

    report
}

/// Labels of connected nodes that no path from `start` reaches. Orphans are
/// reported separately and skipped here.
fn unreachable_from(graph: &Graph, start: &NodeId, touched: &HashSet<&NodeId>) -> Vec<String> {
    let mut map: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in graph.nodes() {
        map.add_node(node.id.as_str());
    }
    for edge in graph.edges() {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if map.contains_node(source) && map.contains_node(target) {
            map.add_edge(source, target, ());
        }
    }

    let mut reached = HashSet::new();
    let mut bfs = Bfs::new(&map, start.as_str());
    while let Some(id) = bfs.next(&map) {
        reached.insert(id);
    }

    graph
        .nodes()
        .iter()
        .filter(|n| touched.contains(&n.id) && !reached.contains(n.id.as_str()))
        .map(|n| n.label().to_string())
        .collect()
}

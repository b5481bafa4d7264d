//! Integration tests for wf-graph.

use wf_core::Position;
use wf_graph::{
    EdgePatch, GraphBuilder, GraphError, LineShape, NodeKind, NodePatch, NodePayload, Outcome,
    PayloadPatch, ValidationIssue, validate,
};

#[test]
fn remove_node_cascades_to_touching_edges() {
    // start -> a -> end, start -> end
    let mut b = GraphBuilder::new();
    let start = b.add_node("start", NodeKind::Start, 0.0, 0.0);
    let a = b.add_node("a", NodeKind::Task, 0.0, 100.0);
    let end = b.add_node("end", NodeKind::End, 0.0, 200.0);
    b.connect(&start, &a);
    b.connect(&a, &end);
    let direct = b.connect(&start, &end);
    let mut graph = b.build().unwrap();

    let (removed, edges) = graph.remove_node(&a).unwrap();
    assert_eq!(removed.id, a);
    assert_eq!(edges.len(), 2);
    assert_eq!(graph.nodes().len(), 2);
    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].id, direct);

    assert!(matches!(
        graph.remove_node(&a),
        Err(GraphError::NodeNotFound { .. })
    ));
}

#[test]
fn replace_rejects_duplicate_ids_and_keeps_old_set() {
    let mut b = GraphBuilder::new();
    b.add_node("x", NodeKind::Start, 0.0, 0.0);
    let mut graph = b.build().unwrap();
    let before = graph.clone();

    let dup = graph.nodes()[0].clone();
    let err = graph.replace_nodes(vec![dup.clone(), dup]).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateNodeId { .. }));
    assert_eq!(graph, before);
}

#[test]
fn update_node_merges_patch() {
    let mut b = GraphBuilder::new();
    let timer = b.add_node("wait", NodeKind::Timer, 0.0, 0.0);
    let mut graph = b.build().unwrap();

    let patch = NodePatch {
        label: Some("Cool down".into()),
        fields: Some(PayloadPatch::Timer {
            delay_seconds: Some(90),
        }),
        ..NodePatch::default()
    };
    graph.update_node(&timer, &patch).unwrap();

    let node = graph.node(&timer).unwrap();
    assert_eq!(node.label(), "Cool down");
    assert_eq!(
        node.data.payload,
        NodePayload::Timer { delay_seconds: 90 }
    );
    assert_eq!(node.position, Position::ORIGIN);
}

#[test]
fn update_edge_keeps_endpoints() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", NodeKind::Start, 0.0, 0.0);
    let e = b.add_node("e", NodeKind::End, 0.0, 100.0);
    let edge = b.connect(&s, &e);
    let mut graph = b.build().unwrap();

    let patch = EdgePatch {
        label: Some("always".into()),
        shape: Some(LineShape::Straight),
        animated: Some(false),
        ..EdgePatch::default()
    };
    graph.update_edge(&edge, &patch).unwrap();
    let updated = graph.edge(&edge).unwrap();
    assert_eq!(updated.label, "always");
    assert_eq!(updated.source, s);
    assert_eq!(updated.target, e);
    assert!(!updated.style.animated);
}

#[test]
fn validation_reports_orphans_as_warnings() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", NodeKind::Start, 0.0, 0.0);
    let e = b.add_node("e", NodeKind::End, 0.0, 100.0);
    b.add_node("lonely", NodeKind::Notification, 200.0, 0.0);
    b.connect(&s, &e);
    let graph = b.build().unwrap();

    let report = validate(&graph);
    assert_eq!(report.outcome(), Outcome::PassedWithWarnings);
    assert!(report.errors.is_empty());
    assert_eq!(
        report.warnings,
        vec![ValidationIssue::OrphanNodes {
            labels: vec!["Notification".into()]
        }]
    );
}

#[test]
fn validation_never_mutates() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", NodeKind::Start, 0.0, 0.0);
    b.add_node("s2", NodeKind::Start, 0.0, 0.0);
    let t = b.add_node("t", NodeKind::Task, 0.0, 0.0);
    b.connect(&s, &t);
    let graph = b.build().unwrap();
    let before = graph.clone();

    let report = validate(&graph);
    assert_eq!(report.outcome(), Outcome::Failed);
    assert!(report.errors.contains(&ValidationIssue::MissingEnd));
    assert!(
        report
            .warnings
            .contains(&ValidationIssue::MultipleStarts { count: 2 })
    );
    assert_eq!(graph, before);
}

#[test]
fn graph_json_roundtrip() {
    let mut b = GraphBuilder::new();
    let s = b.add_node("s", NodeKind::Start, 0.0, 0.0);
    let c = b.add_labeled(
        "c",
        "Big order?",
        NodePayload::Condition {
            expression: "order.total > 1000".into(),
        },
        0.0,
        100.0,
    );
    let edge = b.connect_labeled(&s, &c, "next");
    b.condition(&edge, "true");
    let graph = b.build().unwrap();

    let nodes = serde_json::to_string(graph.nodes()).unwrap();
    let edges = serde_json::to_string(graph.edges()).unwrap();
    let rebuilt = wf_graph::Graph::from_parts(
        serde_json::from_str(&nodes).unwrap(),
        serde_json::from_str(&edges).unwrap(),
    )
    .unwrap();
    assert_eq!(rebuilt, graph);
}

//! End-to-end editing sessions against the public editor API.

use chrono::TimeZone;
use wf_core::{Position, Size};
use wf_editor::{
    Command, CommandOutput, Editor, EditorError, Key, Modifiers, PaletteEntry, PendingConfirm,
    Selection, Severity,
};
use wf_graph::{Edge, Graph, GraphBuilder, Node, NodeData, NodeKind, NodePayload, Outcome};
use wf_project::{EditorConfig, FileSlotStore, TemplateId};

fn editor() -> Editor {
    Editor::new(EditorConfig::default()).unwrap()
}

#[test]
fn undo_then_redo_restores_each_state() {
    let mut editor = editor();
    let mut states = vec![editor.graph().clone()];
    for i in 0..4 {
        editor
            .add_node(NodeKind::Task, Position::new(10.0 * i as f64, 0.0))
            .unwrap();
        states.push(editor.graph().clone());
    }

    for expected in states.iter().rev().skip(1) {
        editor.undo().unwrap();
        assert_eq!(editor.graph(), expected);
    }
    assert!(matches!(editor.undo(), Err(EditorError::NothingToUndo)));

    for expected in states.iter().skip(1) {
        editor.redo().unwrap();
        assert_eq!(editor.graph(), expected);
    }
    assert!(matches!(editor.redo(), Err(EditorError::NothingToRedo)));
}

#[test]
fn new_edit_discards_redo_tail() {
    let mut editor = editor();
    editor.add_node(NodeKind::Timer, Position::ORIGIN).unwrap();
    editor.add_node(NodeKind::Timer, Position::ORIGIN).unwrap();
    editor.undo().unwrap();
    assert!(editor.history().can_redo());

    editor.add_node(NodeKind::Condition, Position::ORIGIN).unwrap();
    assert!(!editor.history().can_redo());
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn history_evicts_oldest_past_capacity() {
    let config = EditorConfig {
        history_capacity: 5,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config).unwrap();
    for _ in 0..10 {
        editor.add_node(NodeKind::Task, Position::ORIGIN).unwrap();
    }
    assert_eq!(editor.history().len(), 6);
    assert_eq!(editor.history().index(), Some(5));

    let mut undone = 0;
    while editor.undo().is_ok() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    // Oldest reachable state already has 5 of the 10 added nodes.
    assert_eq!(editor.graph().nodes().len(), 3 + 5);
}

#[test]
fn full_capacity_of_edits_undoes_back_to_seed() {
    let mut editor = editor();
    let seed = editor.graph().clone();
    let capacity = editor.config().history_capacity;
    for i in 0..capacity {
        editor
            .add_node(NodeKind::Task, Position::new(i as f64, 0.0))
            .unwrap();
    }
    let last = editor.graph().clone();

    for _ in 0..capacity {
        editor.undo().unwrap();
    }
    assert_eq!(editor.graph(), &seed);
    assert!(!editor.history().can_undo());

    for _ in 0..capacity {
        editor.redo().unwrap();
    }
    assert_eq!(editor.graph(), &last);
}

#[test]
fn undo_reloads_open_form() {
    let mut editor = editor();
    editor.click_node(&"task".into()).unwrap();
    if let Some(form) = editor.selection_mut().node_form_mut() {
        form.label = "Edited".into();
    }
    editor.save_panel().unwrap();
    editor.undo().unwrap();

    let Selection::Node { form, .. } = editor.selection() else {
        panic!("selection lost: {:?}", editor.selection());
    };
    assert_eq!(form.label, "Task");

    // Saving the reloaded form must not bring the undone label back.
    editor.save_panel().unwrap();
    assert_eq!(editor.graph().node(&"task".into()).unwrap().label(), "Task");
}

#[test]
fn redo_reloads_open_edge_form() {
    let mut editor = editor();
    let edge = editor.graph().edges()[0].id.clone();
    editor.click_edge(&edge).unwrap();
    if let Some(form) = editor.selection_mut().edge_form_mut() {
        form.label = "on submit".into();
    }
    editor.save_panel().unwrap();
    editor.undo().unwrap();
    editor.redo().unwrap();

    let Selection::Edge { form, .. } = editor.selection() else {
        panic!("selection lost: {:?}", editor.selection());
    };
    assert_eq!(form.label, "on submit");
}

#[test]
fn deleting_node_removes_its_edges() {
    let mut editor = editor();
    editor.click_node(&"task".into()).unwrap();
    editor.dispatch(Command::DeleteSelection);

    assert!(editor.graph().node(&"task".into()).is_none());
    assert!(editor.graph().edges().is_empty());
    assert!(editor.selection().is_idle());

    editor.undo().unwrap();
    assert_eq!(editor.graph().edges().len(), 2);
}

#[test]
fn keyboard_delete_is_immediate_panel_delete_asks() {
    let mut editor = editor();
    editor.click_node(&"task".into()).unwrap();
    let pending = editor.request_delete().unwrap();
    assert_eq!(pending, PendingConfirm::DeleteNode("task".into()));
    assert_eq!(editor.graph().nodes().len(), 3);

    editor.dispatch(Command::Cancel);
    assert!(editor.pending_confirmation().is_none());
    assert_eq!(editor.graph().nodes().len(), 3);

    editor.request_delete().unwrap();
    editor.dispatch(Command::Confirm);
    assert_eq!(editor.graph().nodes().len(), 2);

    editor.click_node(&"start".into()).unwrap();
    editor.handle_key(Key::Delete, Modifiers::NONE);
    assert_eq!(editor.graph().nodes().len(), 1);
}

#[test]
fn seed_graph_passes_validation() {
    let mut editor = editor();
    let output = editor.dispatch(Command::Validate);
    let Some(CommandOutput::Validated(report)) = output else {
        panic!("expected a validation report, got {output:?}");
    };
    assert_eq!(report.outcome(), Outcome::Passed);
    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
}

#[test]
fn missing_start_and_dangling_edge_are_two_errors() {
    let graph = Graph::from_parts(
        vec![Node::new(
            "end".into(),
            Position::ORIGIN,
            NodeData::default_for(NodeKind::End),
        )],
        vec![Edge::new("e1".into(), "ghost".into(), "end".into())],
    )
    .unwrap();
    let editor = Editor::with_graph(EditorConfig::default(), graph);
    let report = editor.validate();
    assert_eq!(report.errors.len(), 2);
    assert_eq!(report.outcome(), Outcome::Failed);
}

#[test]
fn import_valid_file_adds_one_history_entry() {
    let mut source = GraphBuilder::new();
    let s = source.add_node("s", NodeKind::Start, 0.0, 0.0);
    let e = source.add_node("e", NodeKind::End, 0.0, 100.0);
    source.connect(&s, &e);
    let exported = Editor::with_graph(EditorConfig::default(), source.build().unwrap())
        .export()
        .unwrap();

    let mut editor = editor();
    let before = editor.history().len();
    editor.dispatch(Command::Import(exported.contents));
    assert_eq!(editor.history().len(), before + 1);
    assert_eq!(editor.graph().nodes().len(), 2);
    assert_eq!(editor.take_notices()[0].severity, Severity::Success);
}

#[test]
fn import_without_nodes_is_rejected_with_notice() {
    let mut editor = editor();
    let before = editor.graph().clone();
    editor.dispatch(Command::Import(r#"{"foo":1}"#.to_string()));

    assert_eq!(editor.graph(), &before);
    assert_eq!(editor.history().len(), 1);
    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    assert!(notices[0].message.contains("Invalid workflow format"));
}

#[test]
fn copy_paste_offsets_and_renames() {
    let mut editor = editor();
    editor.click_node(&"task".into()).unwrap();
    editor.handle_key(Key::Char('c'), Modifiers::ctrl());
    editor.handle_key(Key::Char('v'), Modifiers::meta());
    editor.handle_key(Key::Char('v'), Modifiers::ctrl());

    assert_eq!(editor.graph().nodes().len(), 5);
    let original = editor.graph().node(&"task".into()).unwrap().clone();
    let pasted: Vec<_> = editor.graph().nodes()[3..].to_vec();
    assert_ne!(pasted[0].id, pasted[1].id);
    for node in &pasted {
        assert_ne!(node.id, original.id);
        assert_eq!(node.data, original.data);
        assert_eq!(node.position, original.position.translate(50.0, 50.0));
    }
}

#[test]
fn copying_an_edge_warns() {
    let mut editor = editor();
    let edge = editor.graph().edges()[0].id.clone();
    editor.click_edge(&edge).unwrap();
    editor.dispatch(Command::Copy);
    let notices = editor.take_notices();
    assert_eq!(notices[0].severity, Severity::Warning);
    assert_eq!(notices[0].message, "Select a node to copy");
    assert!(editor.clipboard().is_empty());
}

#[test]
fn panel_edits_apply_only_on_save() {
    let mut editor = editor();
    editor.click_node(&"task".into()).unwrap();
    if let Some(form) = editor.selection_mut().node_form_mut() {
        form.label = "Review invoice".into();
        form.fields = NodePayload::Task {
            assignee: Some("finance".into()),
            priority: wf_graph::Priority::High,
        };
    }
    assert_eq!(editor.graph().node(&"task".into()).unwrap().label(), "Task");

    editor.save_panel().unwrap();
    let node = editor.graph().node(&"task".into()).unwrap();
    assert_eq!(node.label(), "Review invoice");
    assert!(matches!(editor.selection(), Selection::Node { .. }));
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn drop_recentres_without_extra_history() {
    let mut editor = editor();
    let entry = PaletteEntry::new(NodeKind::Approval);
    editor.begin_drag(&entry);
    editor.drag_over(Position::new(400.0, 300.0));
    let id = editor.drop_on_canvas().unwrap();
    assert_eq!(editor.history().len(), 2);

    editor.node_measured(&id, Size::new(100.0, 40.0)).unwrap();
    let node = editor.graph().node(&id).unwrap();
    assert_eq!(node.position, Position::new(350.0, 280.0));
    assert_eq!(editor.history().len(), 2);

    // Only the first measurement moves the node.
    editor.node_measured(&id, Size::new(200.0, 80.0)).unwrap();
    assert_eq!(
        editor.graph().node(&id).unwrap().position,
        Position::new(350.0, 280.0)
    );

    editor.undo().unwrap();
    assert!(editor.graph().node(&id).is_none());
}

#[test]
fn size_report_after_undone_drop_is_ignored() {
    let mut editor = editor();
    editor.begin_drag(&PaletteEntry::new(NodeKind::Timer));
    editor.drag_over(Position::new(100.0, 100.0));
    let id = editor.drop_on_canvas().unwrap();
    editor.undo().unwrap();
    let before = editor.graph().clone();

    editor.node_measured(&id, Size::new(80.0, 40.0)).unwrap();
    assert_eq!(editor.graph(), &before);
    assert_eq!(editor.history().len(), 2);
    assert!(editor.history().can_redo());

    // The stale re-centre is gone: redoing the drop leaves the anchor as is.
    editor.redo().unwrap();
    editor.node_measured(&id, Size::new(80.0, 40.0)).unwrap();
    assert_eq!(
        editor.graph().node(&id).unwrap().position,
        Position::new(100.0, 100.0)
    );
}

#[test]
fn crossed_zoom_limits_do_not_panic() {
    let config = EditorConfig {
        min_zoom: 4.0,
        max_zoom: 0.2,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config).unwrap();
    editor.dispatch(Command::ZoomIn);
    editor.dispatch(Command::FitView);
    assert!(editor.viewport().zoom.is_finite());
}

#[test]
fn drag_released_off_canvas_adds_nothing() {
    let mut editor = editor();
    editor.begin_drag(&PaletteEntry::custom("Escalate"));
    assert!(editor.end_drag());
    assert!(matches!(editor.drop_on_canvas(), Err(EditorError::NoDrag)));
    assert_eq!(editor.graph().nodes().len(), 3);
}

#[test]
fn template_load_waits_for_confirmation() {
    let mut editor = editor();
    let output = editor.dispatch(Command::LoadTemplate("approval".into()));
    assert_eq!(
        output,
        Some(CommandOutput::NeedsConfirmation(PendingConfirm::LoadTemplate(
            TemplateId::Approval
        )))
    );
    assert_eq!(editor.graph().nodes().len(), 3);

    editor.dispatch(Command::Confirm);
    assert_eq!(editor.graph().nodes().len(), 7);
    assert_eq!(editor.graph().edges().len(), 8);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn unknown_template_is_reported() {
    let mut editor = editor();
    assert_eq!(editor.dispatch(Command::LoadTemplate("rocket".into())), None);
    let notices = editor.take_notices();
    assert_eq!(notices[0].severity, Severity::Error);
    assert!(editor.pending_confirmation().is_none());
}

#[test]
fn clear_is_undoable() {
    let mut editor = editor();
    editor.dispatch(Command::Clear);
    editor.dispatch(Command::Confirm);
    assert!(editor.graph().is_empty());
    editor.undo().unwrap();
    assert_eq!(editor.graph().nodes().len(), 3);
}

#[test]
fn load_from_empty_slot_warns() {
    let mut editor = editor();
    editor.dispatch(Command::Load);
    let notices = editor.take_notices();
    assert_eq!(notices[0].severity, Severity::Warning);
    assert_eq!(editor.graph().nodes().len(), 3);
}

#[test]
fn save_and_load_through_file_slots() {
    let dir = std::env::temp_dir().join("wf_editor_slot_session");
    let store = FileSlotStore::new(dir).unwrap();
    let mut editor = editor().with_slot_store(Box::new(store));

    editor.dispatch(Command::Save);
    editor.dispatch(Command::Clear);
    editor.dispatch(Command::Confirm);
    assert!(editor.graph().is_empty());

    editor.dispatch(Command::Load);
    assert_eq!(editor.graph().nodes().len(), 3);
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn export_names_file_by_time() {
    let editor = editor();
    let now = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    let file = editor.export_at(now).unwrap();
    assert_eq!(file.file_name, "workflow-20240309-140507.json");

    let value: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
    assert_eq!(value["metadata"]["version"], "1.0.0");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn viewport_commands() {
    let mut editor = editor();
    editor.dispatch(Command::ZoomIn);
    assert!((editor.viewport().zoom - 1.2).abs() < 1e-9);
    editor.dispatch(Command::ToggleGrid);
    assert!(!editor.viewport().show_grid);

    editor.dispatch(Command::FitView);
    let vp = editor.viewport();
    // Seed nodes span 150x240 at default size; centre lands mid-canvas.
    let centre = vp.canvas_to_screen(Position::new(325.0, 170.0));
    assert!((centre.x - vp.canvas.width / 2.0).abs() < 1e-6);
    assert!((centre.y - vp.canvas.height / 2.0).abs() < 1e-6);
}

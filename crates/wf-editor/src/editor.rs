//! The designer session: live graph plus everything that edits it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use wf_core::{EdgeId, IdGenerator, NodeId, Position, Rect, Size};
use wf_graph::{Edge, Graph, GraphError, GraphStats, Node, NodeData, NodeKind, ValidationReport};
use wf_project::{
    EditorConfig, ExportFile, MemorySlotStore, SlotStore, TemplateId, build_template,
    export_file, import_json, load_from_slot, save_to_slot, seed_graph,
};

use crate::clipboard::Clipboard;
use crate::error::{EditorError, EditorResult};
use crate::history::History;
use crate::keymap::{Command, Key, Keymap, Modifiers};
use crate::notice::Notice;
use crate::palette::{DragSession, PaletteEntry, PendingNode};
use crate::selection::Selection;
use crate::viewport::Viewport;

/// Destructive action waiting for the user's OK.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingConfirm {
    DeleteNode(NodeId),
    DeleteEdge(EdgeId),
    LoadTemplate(TemplateId),
    Clear,
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirm::DeleteNode(id) => {
                format!("Delete node '{}' and its connections?", id)
            }
            PendingConfirm::DeleteEdge(id) => format!("Delete connection '{}'?", id),
            PendingConfirm::LoadTemplate(t) => {
                format!("Loading '{}' replaces the current canvas. Continue?", t.title())
            }
            PendingConfirm::Clear => "Remove every node and connection?".to_string(),
        }
    }
}

/// Non-notice result of a dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Exported(ExportFile),
    Validated(ValidationReport),
    NeedsConfirmation(PendingConfirm),
}

/// Node dropped from the palette that still has to be centred on its
/// rendered box.
#[derive(Debug, Clone)]
struct PendingRecenter {
    id: NodeId,
    revision: u64,
}

pub struct Editor {
    config: EditorConfig,
    graph: Graph,
    history: History,
    selection: Selection,
    clipboard: Clipboard,
    drag: DragSession,
    viewport: Viewport,
    keymap: Keymap,
    ids: IdGenerator,
    measured: HashMap<NodeId, Size>,
    recenter: Option<PendingRecenter>,
    confirm: Option<PendingConfirm>,
    slots: Box<dyn SlotStore>,
    created_at: DateTime<Utc>,
    /// Bumped on every graph change; stale drop re-centres are detected with it.
    revision: u64,
    notices: Vec<Notice>,
}

impl Editor {
    /// Session opening on the default start -> task -> end canvas.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let graph = seed_graph()?;
        Ok(Self::with_graph(config, graph))
    }

    pub fn with_graph(config: EditorConfig, graph: Graph) -> Self {
        let mut history = History::new(config.history_capacity);
        history.record(&graph);
        let viewport = Viewport::new(
            Size::new(1200.0, 800.0),
            config.zoom_step,
            config.min_zoom,
            config.max_zoom,
        );
        Self {
            config,
            graph,
            history,
            selection: Selection::Idle,
            clipboard: Clipboard::new(),
            drag: DragSession::default(),
            viewport,
            keymap: Keymap::default(),
            ids: IdGenerator::new(),
            measured: HashMap::new(),
            recenter: None,
            confirm: None,
            slots: Box::new(MemorySlotStore::new()),
            created_at: Utc::now(),
            revision: 0,
            notices: Vec::new(),
        }
    }

    pub fn with_slot_store(mut self, store: Box<dyn SlotStore>) -> Self {
        self.slots = store;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Form edits happen here; nothing reaches the graph until `save_panel`.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirm> {
        self.confirm.as_ref()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Drain notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ----- single mutation entry point -----

    /// Run `f` on a copy of the graph; on success swap it in and record
    /// history. On failure the live graph is untouched.
    fn apply<T>(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut Graph) -> EditorResult<T>,
    ) -> EditorResult<T> {
        let mut next = self.graph.clone();
        let out = f(&mut next).inspect_err(|e| warn!(action, error = %e, "edit rejected"))?;
        let previous = std::mem::replace(&mut self.graph, next);
        self.history.record(&self.graph);
        self.after_graph_change(&previous);
        debug!(
            action,
            nodes = self.graph.nodes().len(),
            edges = self.graph.edges().len(),
            "graph updated"
        );
        Ok(out)
    }

    fn restore(&mut self, graph: Graph) {
        let previous = std::mem::replace(&mut self.graph, graph);
        self.after_graph_change(&previous);
    }

    /// Drop a selection whose entity is gone and reload the open form when
    /// the entity itself changed.
    fn after_graph_change(&mut self, previous: &Graph) {
        self.revision += 1;
        let refreshed = match &self.selection {
            Selection::Idle => None,
            Selection::Node { id, .. } => match self.graph.node(id) {
                None => Some(Selection::Idle),
                Some(node) if previous.node(id) != Some(node) => Some(Selection::node(node)),
                Some(_) => None,
            },
            Selection::Edge { id, .. } => match self.graph.edge(id) {
                None => Some(Selection::Idle),
                Some(edge) if previous.edge(id) != Some(edge) => Some(Selection::edge(edge)),
                Some(_) => None,
            },
        };
        if let Some(selection) = refreshed {
            self.selection = selection;
        }
        let graph = &self.graph;
        self.measured.retain(|id, _| graph.contains_node(id));
    }

    // ----- direct manipulation -----

    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> EditorResult<NodeId> {
        let node = Node::new(self.ids.next_node_id(), position, NodeData::default_for(kind));
        let id = node.id.clone();
        self.apply("add node", |g| Ok(g.add_node(node)?))?;
        Ok(id)
    }

    /// Connect two nodes on the canvas with a default-styled edge.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> EditorResult<EdgeId> {
        for id in [source, target] {
            if !self.graph.contains_node(id) {
                return Err(GraphError::NodeNotFound { id: id.clone() }.into());
            }
        }
        let edge = Edge::new(
            self.ids.next_edge_id(source, target),
            source.clone(),
            target.clone(),
        );
        let id = edge.id.clone();
        self.apply("connect", |g| Ok(g.add_edge(edge)?))?;
        Ok(id)
    }

    pub fn move_node(&mut self, id: &NodeId, position: Position) -> EditorResult<()> {
        self.apply("move node", |g| Ok(g.move_node(id, position)?))
    }

    // ----- selection & config panels -----

    pub fn click_node(&mut self, id: &NodeId) -> EditorResult<()> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound { id: id.clone() })?;
        self.selection = Selection::node(node);
        Ok(())
    }

    pub fn click_edge(&mut self, id: &EdgeId) -> EditorResult<()> {
        let edge = self
            .graph
            .edge(id)
            .ok_or_else(|| GraphError::EdgeNotFound { id: id.clone() })?;
        self.selection = Selection::edge(edge);
        Ok(())
    }

    pub fn click_canvas(&mut self) {
        self.selection = Selection::Idle;
    }

    pub fn close_panel(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Merge the open form into the selected entity. The panel stays open.
    pub fn save_panel(&mut self) -> EditorResult<()> {
        match self.selection.clone() {
            Selection::Idle => Err(EditorError::NothingSelected),
            Selection::Node { id, form } => {
                let patch = form.to_patch();
                self.apply("edit node", |g| Ok(g.update_node(&id, &patch)?))?;
                self.click_node(&id)
            }
            Selection::Edge { id, form } => {
                let patch = form.to_patch();
                self.apply("edit edge", |g| Ok(g.update_edge(&id, &patch)?))?;
                self.click_edge(&id)
            }
        }
    }

    /// Panel delete button: ask first.
    pub fn request_delete(&mut self) -> EditorResult<PendingConfirm> {
        let pending = match &self.selection {
            Selection::Idle => return Err(EditorError::NothingSelected),
            Selection::Node { id, .. } => PendingConfirm::DeleteNode(id.clone()),
            Selection::Edge { id, .. } => PendingConfirm::DeleteEdge(id.clone()),
        };
        self.confirm = Some(pending.clone());
        Ok(pending)
    }

    /// Delete whatever is selected right away (keyboard path).
    pub fn delete_selection(&mut self) -> EditorResult<()> {
        match self.selection.clone() {
            Selection::Idle => Err(EditorError::NothingSelected),
            Selection::Node { id, .. } => self.delete_node(&id),
            Selection::Edge { id, .. } => self.delete_edge(&id),
        }
    }

    pub fn delete_node(&mut self, id: &NodeId) -> EditorResult<()> {
        self.apply("delete node", |g| g.remove_node(id).map(|_| ()).map_err(Into::into))?;
        self.selection = Selection::Idle;
        Ok(())
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> EditorResult<()> {
        self.apply("delete edge", |g| g.remove_edge(id).map(|_| ()).map_err(Into::into))?;
        self.selection = Selection::Idle;
        Ok(())
    }

    /// Run the action waiting for confirmation.
    pub fn confirm(&mut self) -> EditorResult<PendingConfirm> {
        let pending = self.confirm.take().ok_or(EditorError::NothingToConfirm)?;
        match &pending {
            PendingConfirm::DeleteNode(id) => self.delete_node(id)?,
            PendingConfirm::DeleteEdge(id) => self.delete_edge(id)?,
            PendingConfirm::LoadTemplate(template) => self.load_template(*template)?,
            PendingConfirm::Clear => self.clear()?,
        }
        Ok(pending)
    }

    /// Drop the pending confirmation. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.confirm.take().is_some()
    }

    // ----- clipboard -----

    pub fn copy(&mut self) -> EditorResult<()> {
        let id = match &self.selection {
            Selection::Node { id, .. } => id,
            Selection::Edge { .. } => return Err(EditorError::NotANode),
            Selection::Idle => return Err(EditorError::NothingSelected),
        };
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound { id: id.clone() })?;
        self.clipboard.copy(node);
        Ok(())
    }

    pub fn paste(&mut self) -> EditorResult<NodeId> {
        let node = self
            .clipboard
            .paste(&mut self.ids, self.config.paste_offset)
            .ok_or(EditorError::ClipboardEmpty)?;
        let id = node.id.clone();
        self.apply("paste", |g| Ok(g.add_node(node)?))?;
        Ok(id)
    }

    // ----- history -----

    pub fn undo(&mut self) -> EditorResult<()> {
        let graph = self.history.undo()?;
        self.restore(graph);
        Ok(())
    }

    pub fn redo(&mut self) -> EditorResult<()> {
        let graph = self.history.redo()?;
        self.restore(graph);
        Ok(())
    }

    // ----- palette drag/drop -----

    pub fn begin_drag(&mut self, entry: &PaletteEntry) -> NodeId {
        let pending = PendingNode::from_entry(entry, &mut self.ids);
        let id = pending.id.clone();
        debug!(node = %id, kind = %entry.kind, "drag started");
        self.drag.begin(pending);
        id
    }

    pub fn drag_over(&mut self, screen: Position) {
        self.drag.pointer_moved(screen);
    }

    /// Drop at the last pointer position; the node is anchored there until
    /// its rendered size is reported.
    pub fn drop_on_canvas(&mut self) -> EditorResult<NodeId> {
        let (pending, pointer) = self.drag.take().ok_or(EditorError::NoDrag)?;
        let anchor = self
            .viewport
            .screen_to_canvas(pointer.unwrap_or(Position::ORIGIN))
            .ensure_finite()?;
        let node = pending.place(anchor);
        let id = node.id.clone();
        self.apply("drop node", |g| Ok(g.add_node(node)?))?;
        self.recenter = Some(PendingRecenter {
            id: id.clone(),
            revision: self.revision,
        });
        Ok(id)
    }

    /// Drag ended outside the canvas. Returns whether a drag was discarded.
    pub fn end_drag(&mut self) -> bool {
        let active = self.drag.is_active();
        self.drag.cancel();
        active
    }

    /// Renderer reports a node's size. A freshly dropped node is centred on
    /// the drop point once, folded into the drop's history entry.
    pub fn node_measured(&mut self, id: &NodeId, size: Size) -> EditorResult<()> {
        let pending = self.recenter.take_if(|r| r.id == *id);
        let Some(node) = self.graph.node(id) else {
            debug!(node = %id, "size report for a node no longer on the canvas");
            return Ok(());
        };
        let centred = node
            .position
            .translate(-size.width / 2.0, -size.height / 2.0);
        self.measured.insert(id.clone(), size);

        match pending {
            None => Ok(()),
            Some(pending) if pending.revision == self.revision => {
                self.graph.move_node(id, centred)?;
                self.history.amend(&self.graph);
                Ok(())
            }
            Some(_) => self.apply("centre node", |g| Ok(g.move_node(id, centred)?)),
        }
    }

    // ----- templates & persistence -----

    pub fn request_template(&mut self, template: TemplateId) -> PendingConfirm {
        let pending = PendingConfirm::LoadTemplate(template);
        self.confirm = Some(pending.clone());
        pending
    }

    pub fn load_template(&mut self, template: TemplateId) -> EditorResult<()> {
        let graph = build_template(template)?;
        self.replace_graph("load template", graph)?;
        self.fit_view();
        info!(template = %template, "template loaded");
        Ok(())
    }

    pub fn request_clear(&mut self) -> PendingConfirm {
        self.confirm = Some(PendingConfirm::Clear);
        PendingConfirm::Clear
    }

    pub fn clear(&mut self) -> EditorResult<()> {
        self.apply("clear", |g| {
            g.clear();
            Ok(())
        })
    }

    fn replace_graph(&mut self, action: &'static str, graph: Graph) -> EditorResult<()> {
        let (nodes, edges) = graph.into_parts();
        self.apply(action, |g| {
            g.replace_nodes(nodes)?;
            g.replace_edges(edges)?;
            Ok(())
        })
    }

    pub fn save_local(&mut self) -> EditorResult<()> {
        save_to_slot(self.slots.as_mut(), &self.config.slot_name, &self.graph)?;
        Ok(())
    }

    pub fn load_local(&mut self) -> EditorResult<()> {
        let graph = load_from_slot(self.slots.as_ref(), &self.config.slot_name)?;
        self.replace_graph("load local", graph)
    }

    pub fn export(&self) -> EditorResult<ExportFile> {
        self.export_at(Utc::now())
    }

    pub fn export_at(&self, now: DateTime<Utc>) -> EditorResult<ExportFile> {
        Ok(export_file(&self.graph, self.created_at, now)?)
    }

    pub fn import(&mut self, text: &str) -> EditorResult<()> {
        let graph = import_json(text)?;
        self.replace_graph("import", graph)
    }

    pub fn validate(&self) -> ValidationReport {
        wf_graph::validate(&self.graph)
    }

    // ----- viewport -----

    pub fn toggle_grid(&mut self) -> bool {
        self.viewport.toggle_grid()
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn resize_canvas(&mut self, canvas: Size) {
        self.viewport.canvas = canvas;
    }

    pub fn fit_view(&mut self) {
        let bounds = Rect::bounding(self.graph.nodes().iter().map(|n| {
            let size = self
                .measured
                .get(&n.id)
                .copied()
                .unwrap_or(self.config.default_node_size);
            Rect::from_origin_size(n.position, size)
        }));
        self.viewport.fit(bounds, self.config.fit_padding);
    }

    // ----- command dispatch -----

    /// Look up a key event in the keymap and dispatch it.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Option<CommandOutput> {
        let command = self.keymap.lookup(key, modifiers)?;
        self.dispatch(command)
    }

    /// Execute one command. Failures become notices; nothing here panics or
    /// leaves the graph half-changed.
    pub fn dispatch(&mut self, command: Command) -> Option<CommandOutput> {
        debug!(?command, "dispatch");
        match self.run(command) {
            Ok(output) => output,
            Err(err) => {
                self.notices.push(Notice::from(&err));
                None
            }
        }
    }

    fn run(&mut self, command: Command) -> EditorResult<Option<CommandOutput>> {
        match command {
            Command::DeleteSelection => {
                self.delete_selection()?;
                self.notices.push(Notice::success("Deleted"));
            }
            Command::Save => {
                self.save_local()?;
                self.notices.push(Notice::success("Workflow saved"));
            }
            Command::Load => {
                self.load_local()?;
                self.notices.push(Notice::success("Workflow loaded"));
            }
            Command::Copy => {
                self.copy()?;
                self.notices.push(Notice::info("Node copied"));
            }
            Command::Paste => {
                self.paste()?;
                self.notices.push(Notice::success("Node pasted"));
            }
            Command::Undo => self.undo()?,
            Command::Redo => self.redo()?,
            Command::Import(text) => {
                self.import(&text)?;
                self.notices.push(Notice::success("Workflow imported"));
            }
            Command::Export => {
                let file = self.export()?;
                self.notices
                    .push(Notice::success(format!("Exported {}", file.file_name)));
                return Ok(Some(CommandOutput::Exported(file)));
            }
            Command::LoadTemplate(id) => {
                let template: TemplateId = id.parse()?;
                let pending = self.request_template(template);
                self.notices.push(Notice::info(pending.prompt()));
                return Ok(Some(CommandOutput::NeedsConfirmation(pending)));
            }
            Command::Validate => {
                let report = self.validate();
                let notice = match report.outcome() {
                    wf_graph::Outcome::Passed => Notice::success(report.summary()),
                    wf_graph::Outcome::PassedWithWarnings => Notice::warning(report.summary()),
                    wf_graph::Outcome::Failed => Notice::error(report.summary()),
                };
                self.notices.push(notice);
                return Ok(Some(CommandOutput::Validated(report)));
            }
            Command::Clear => {
                let pending = self.request_clear();
                self.notices.push(Notice::info(pending.prompt()));
                return Ok(Some(CommandOutput::NeedsConfirmation(pending)));
            }
            Command::ToggleGrid => {
                self.toggle_grid();
            }
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::FitView => self.fit_view(),
            Command::Confirm => {
                let done = self.confirm()?;
                let message = match done {
                    PendingConfirm::DeleteNode(_) | PendingConfirm::DeleteEdge(_) => "Deleted",
                    PendingConfirm::LoadTemplate(_) => "Template loaded",
                    PendingConfirm::Clear => "Canvas cleared",
                };
                self.notices.push(Notice::success(message));
            }
            Command::Cancel => {
                if !self.cancel() {
                    self.close_panel();
                }
            }
        }
        Ok(None)
    }
}

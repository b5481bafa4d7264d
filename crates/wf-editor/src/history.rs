//! Linear undo/redo over whole-graph snapshots.

use std::collections::VecDeque;

use tracing::debug;
use wf_graph::Graph;

use crate::error::{EditorError, EditorResult};

/// Immutable copy of the graph at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    graph: Graph,
}

impl GraphSnapshot {
    pub fn capture(graph: &Graph) -> Self {
        Self {
            graph: graph.clone(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Fresh copy for the live canvas; later edits never reach the snapshot.
    pub fn restore(&self) -> Graph {
        self.graph.clone()
    }
}

/// Bounded snapshot stack with a cursor.
///
/// `capacity` counts undoable steps, so up to `capacity + 1` snapshots are
/// kept: the oldest one is the state the last undo returns to.
///
/// Invariant: `index` is `None` iff the stack is empty, otherwise
/// `index < len`.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<GraphSnapshot>,
    index: Option<usize>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            index: None,
            capacity: capacity.max(1),
        }
    }

    /// Push the current graph, dropping any redo tail and the oldest entry
    /// once more than `capacity` steps are stored.
    pub fn record(&mut self, graph: &Graph) {
        match self.index {
            Some(i) => self.snapshots.truncate(i + 1),
            None => self.snapshots.clear(),
        }
        self.snapshots.push_back(GraphSnapshot::capture(graph));
        if self.snapshots.len() > self.capacity + 1 {
            self.snapshots.pop_front();
        }
        self.index = Some(self.snapshots.len() - 1);
        debug!(len = self.snapshots.len(), "history recorded");
    }

    /// Overwrite the snapshot under the cursor (follow-up adjustment of the
    /// action that was just recorded).
    pub fn amend(&mut self, graph: &Graph) {
        match self.index {
            Some(i) => self.snapshots[i] = GraphSnapshot::capture(graph),
            None => self.record(graph),
        }
    }

    pub fn undo(&mut self) -> EditorResult<Graph> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                debug!(index = i - 1, "undo");
                Ok(self.snapshots[i - 1].restore())
            }
            _ => Err(EditorError::NothingToUndo),
        }
    }

    pub fn redo(&mut self) -> EditorResult<Graph> {
        match self.index {
            Some(i) if i + 1 < self.snapshots.len() => {
                self.index = Some(i + 1);
                debug!(index = i + 1, "redo");
                Ok(self.snapshots[i + 1].restore())
            }
            _ => Err(EditorError::NothingToRedo),
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.snapshots.len())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.index.map(|i| &self.snapshots[i])
    }
}

//! Named local save slots holding `{ nodes, edges }` JSON text.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wf_graph::{Edge, Graph, Node};

use crate::{ProjectError, ProjectResult};

/// Backing storage for save slots. Contents are opaque text.
pub trait SlotStore {
    /// `Ok(None)` when nothing was ever saved under `slot`.
    fn read(&self, slot: &str) -> ProjectResult<Option<String>>;

    fn write(&mut self, slot: &str, contents: &str) -> ProjectResult<()>;
}

#[derive(Serialize, Deserialize)]
struct SlotDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

pub fn save_to_slot(store: &mut dyn SlotStore, slot: &str, graph: &Graph) -> ProjectResult<()> {
    let document = SlotDocument {
        nodes: graph.nodes().to_vec(),
        edges: graph.edges().to_vec(),
    };
    let contents = serde_json::to_string(&document)?;
    store.write(slot, &contents)?;
    debug!(slot, nodes = document.nodes.len(), "saved workflow to slot");
    Ok(())
}

/// Load a graph; missing or malformed slots are errors and nothing changes.
pub fn load_from_slot(store: &dyn SlotStore, slot: &str) -> ProjectResult<Graph> {
    let contents = store.read(slot)?.ok_or_else(|| ProjectError::SlotMissing {
        slot: slot.to_string(),
    })?;
    let malformed = |reason: String| {
        warn!(slot, %reason, "slot contents rejected");
        ProjectError::SlotMalformed {
            slot: slot.to_string(),
            reason,
        }
    };
    let document: SlotDocument =
        serde_json::from_str(&contents).map_err(|e| malformed(e.to_string()))?;
    Graph::from_parts(document.nodes, document.edges).map_err(|e| malformed(e.to_string()))
}

/// One `<slot>.json` file per slot under a root directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    root_dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(root_dir: PathBuf) -> ProjectResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", slot))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> ProjectResult<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, slot: &str, contents: &str) -> ProjectResult<()> {
        fs::write(self.slot_path(slot), contents)?;
        Ok(())
    }
}

/// In-process slots, for tests and embedders without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> ProjectResult<Option<String>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, contents: &str) -> ProjectResult<()> {
        self.slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }
}

//! wf-project: workflow file formats, local slots, templates and settings.

pub mod config;
pub mod document;
pub mod slots;
pub mod templates;

pub use config::{EditorConfig, load_config};
pub use document::{
    EXPORT_VERSION, ExportDocument, ExportFile, ExportMetadata, export_document, export_file,
    import_json,
};
pub use slots::{FileSlotStore, MemorySlotStore, SlotStore, load_from_slot, save_to_slot};
pub use templates::{TemplateId, build_template, seed_graph};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    /// Import text is not JSON at all.
    #[error("Failed to parse workflow JSON: {0}")]
    ParseFailed(#[source] serde_json::Error),

    /// JSON parsed, but it is not a `{ nodes, edges }` document.
    #[error("Invalid workflow format: {reason}")]
    InvalidFormat { reason: String },

    #[error("No saved workflow in slot '{slot}'")]
    SlotMissing { slot: String },

    #[error("Saved workflow in slot '{slot}' is unreadable: {reason}")]
    SlotMalformed { slot: String, reason: String },

    #[error("Invalid editor config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown template: {id}")]
    UnknownTemplate { id: String },

    #[error("Graph error: {0}")]
    Graph(#[from] wf_graph::GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

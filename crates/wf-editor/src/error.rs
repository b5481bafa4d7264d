//! Error types for the editor layer.

use crate::notice::Severity;

/// Everything an editor action can fail with. None of these is fatal: the
/// dispatcher turns each into a notice and the graph stays as it was.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Nothing is selected")]
    NothingSelected,

    #[error("Select a node to copy")]
    NotANode,

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("No drag in progress")]
    NoDrag,

    #[error("Nothing is waiting for confirmation")]
    NothingToConfirm,

    #[error(transparent)]
    Graph(#[from] wf_graph::GraphError),

    #[error(transparent)]
    Project(#[from] wf_project::ProjectError),

    #[error(transparent)]
    Core(#[from] wf_core::CoreError),
}

pub type EditorResult<T> = Result<T, EditorError>;

impl EditorError {
    pub fn severity(&self) -> Severity {
        use wf_project::ProjectError;
        match self {
            EditorError::NothingToUndo
            | EditorError::NothingToRedo
            | EditorError::NothingSelected
            | EditorError::NotANode
            | EditorError::ClipboardEmpty
            | EditorError::NoDrag
            | EditorError::NothingToConfirm
            | EditorError::Project(ProjectError::SlotMissing { .. }) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

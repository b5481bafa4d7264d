//! wf-editor: interactive editing model of the workflow designer.
//!
//! The [`Editor`] owns the live graph and everything that reacts to user
//! input: undo/redo history, selection with its config forms, clipboard,
//! palette drag/drop, viewport, and the keyboard/toolbar command table.
//! All graph changes go through one entry point that records history.

pub mod clipboard;
pub mod editor;
pub mod error;
pub mod history;
pub mod keymap;
pub mod notice;
pub mod palette;
pub mod selection;
pub mod viewport;

// Re-export key types for convenience
pub use clipboard::Clipboard;
pub use editor::{CommandOutput, Editor, PendingConfirm};
pub use error::{EditorError, EditorResult};
pub use history::{GraphSnapshot, History};
pub use keymap::{Command, Key, KeyChord, Keymap, Modifiers};
pub use notice::{Notice, Severity};
pub use palette::{DragSession, PaletteEntry, PendingNode, palette};
pub use selection::{EdgeForm, NodeForm, Selection};
pub use viewport::Viewport;

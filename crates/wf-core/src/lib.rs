//! wf-core: shared foundation for the workflow designer.
//!
//! Contains:
//! - ids (string identifiers + time-based generator)
//! - geometry (canvas positions, sizes, rectangles)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use geometry::*;
pub use ids::*;

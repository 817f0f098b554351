//! Bulk metadata editing.

pub mod engine;
pub mod merge;

pub use engine::BulkMutationEngine;
pub use merge::resolve_update;

//! File domain entities.

pub mod model;
pub mod patch;
pub mod update;

pub use model::File;
pub use patch::{BulkPatch, SharedWithUpdate};
pub use update::FileUpdate;

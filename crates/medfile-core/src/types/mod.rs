//! Core type definitions used across the medfile workspace.

pub mod id;
pub mod sorting;

pub use id::*;
pub use sorting::{SortDirection, SortKey, SortOrder};

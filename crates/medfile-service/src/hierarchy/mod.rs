//! The canonical folder/file hierarchy and its loader.

pub mod loader;
pub mod store;
pub mod tree;

pub use loader::HierarchyLoader;
pub use store::{Children, Hierarchy};

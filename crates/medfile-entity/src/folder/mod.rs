//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{Folder, FolderColor, FolderListing};
pub use tree::FolderNode;

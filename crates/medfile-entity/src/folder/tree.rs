//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use medfile_core::types::FolderId;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Whether this is a patient folder.
    pub is_patient_folder: bool,
    /// Depth level (0 for the node the tree was built from).
    pub depth: usize,
    /// Number of files directly in this folder.
    pub file_count: usize,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of folders in this subtree, including this one.
    pub fn total_folders(&self) -> usize {
        1 + self.children.iter().map(FolderNode::total_folders).sum::<usize>()
    }

    /// Total number of files in this subtree.
    pub fn total_files(&self) -> usize {
        self.file_count + self.children.iter().map(FolderNode::total_files).sum::<usize>()
    }
}

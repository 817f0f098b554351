//! Folder-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::FolderId;

/// Events related to folder operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEvent {
    /// A folder subtree was moved under a new parent.
    Moved {
        /// The folder ID.
        folder_id: FolderId,
        /// The previous parent.
        from_parent_id: FolderId,
        /// The new parent.
        to_parent_id: FolderId,
        /// New name when the move collided with a sibling folder.
        renamed_to: Option<String>,
    },
}

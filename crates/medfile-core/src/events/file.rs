//! File-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::{FileId, FolderId};

/// Events related to file operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileEvent {
    /// A bulk patch changed a file's metadata.
    Patched {
        /// The file ID.
        file_id: FileId,
        /// Fields that changed.
        changed_fields: Vec<String>,
    },
    /// A file was moved to another folder.
    Moved {
        /// The file ID.
        file_id: FileId,
        /// The source folder.
        from_folder_id: FolderId,
        /// The destination folder.
        to_folder_id: FolderId,
        /// New name when the move collided with an existing file.
        renamed_to: Option<String>,
    },
    /// A file disappeared from the document store and was dropped locally.
    Evicted {
        /// The file ID.
        file_id: FileId,
    },
}

//! Intents staged behind a confirmation step.

use serde::{Deserialize, Serialize};

use medfile_core::types::{FileId, FolderId};
use medfile_entity::file::BulkPatch;

/// A staged bulk edit or move, captured from the selection when the dialog
/// opened. Discarding it issues no document-store calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum PendingIntent {
    /// Apply a patch to the captured files.
    BulkEdit {
        /// Files selected when staged.
        file_ids: Vec<FileId>,
        /// The patch to apply.
        patch: BulkPatch,
    },
    /// Move the captured files.
    Move {
        /// Files selected when staged.
        file_ids: Vec<FileId>,
        /// Destination folder.
        destination: FolderId,
    },
}

impl PendingIntent {
    /// The files this intent targets.
    pub fn file_ids(&self) -> &[FileId] {
        match self {
            Self::BulkEdit { file_ids, .. } | Self::Move { file_ids, .. } => file_ids,
        }
    }
}

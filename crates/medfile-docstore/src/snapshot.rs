//! JSON snapshot of a folder/file hierarchy.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use medfile_core::error::AppError;
use medfile_core::types::FolderId;
use medfile_entity::file::File;
use medfile_entity::folder::Folder;

/// Every folder and file of one hierarchy, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The root folder.
    pub root_id: FolderId,
    /// All folders, root included.
    pub folders: Vec<Folder>,
    /// All files.
    #[serde(default)]
    pub files: Vec<File>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file.
    pub async fn read_from(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await.map_err(|e| {
            AppError::storage(format!("Failed to read snapshot '{}': {e}", path.display()))
        })?;
        let snapshot: Self = serde_json::from_slice(&raw)?;
        debug!(
            path = %path.display(),
            folders = snapshot.folders.len(),
            files = snapshot.files.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await.map_err(|e| {
            AppError::storage(format!("Failed to write snapshot '{}': {e}", path.display()))
        })?;
        Ok(())
    }
}

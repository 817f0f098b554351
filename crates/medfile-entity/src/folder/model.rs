//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medfile_core::types::FolderId;

use crate::file::File;

/// Display color of a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    /// Default color.
    #[default]
    Blue,
    /// Green.
    Green,
    /// Red.
    Red,
    /// Orange.
    Orange,
    /// Purple.
    Purple,
    /// Yellow.
    Yellow,
    /// Gray.
    Gray,
}

/// A folder in the file hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (`None` only for the root folder).
    pub parent_id: Option<FolderId>,
    /// Display color.
    #[serde(default)]
    pub color: FolderColor,
    /// Whether the folder is bound to a specific patient record.
    #[serde(default)]
    pub is_patient_folder: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create the root folder.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(),
            name: name.into(),
            parent_id: None,
            color: FolderColor::default(),
            is_patient_folder: false,
            created_at: Utc::now(),
        }
    }

    /// Create a regular folder under `parent_id`.
    pub fn new(parent_id: FolderId, name: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::root(name)
        }
    }

    /// Create a patient folder under `parent_id`.
    pub fn patient(parent_id: FolderId, name: impl Into<String>) -> Self {
        Self {
            is_patient_folder: true,
            ..Self::new(parent_id, name)
        }
    }

    /// Set the display color.
    pub fn with_color(mut self, color: FolderColor) -> Self {
        self.color = color;
        self
    }

    /// Check if this is the root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The folders and files directly under one folder, as returned by the
/// document store's `fetch_children`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderListing {
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Files in the folder.
    pub files: Vec<File>,
}

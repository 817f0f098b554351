//! File entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medfile_core::types::{FileId, FolderId, PrincipalId};

use super::update::FileUpdate;

/// A document stored in the practice file manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// The folder containing this file. Always references an existing folder.
    pub folder_id: FolderId,
    /// Category key from the configured taxonomy.
    pub category: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the document is marked confidential.
    #[serde(default)]
    pub confidential: bool,
    /// Staff members or groups the file is shared with.
    #[serde(default)]
    pub shared_with: BTreeSet<PrincipalId>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Create a new file record in `folder_id`.
    pub fn new(folder_id: FolderId, name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FileId::new(),
            name: name.into(),
            folder_id,
            category: category.into(),
            tags: BTreeSet::new(),
            description: String::new(),
            confidential: false,
            shared_with: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the confidential flag.
    pub fn with_confidential(mut self, confidential: bool) -> Self {
        self.confidential = confidential;
        self
    }

    /// Share with the given principals.
    pub fn with_shared_with<I>(mut self, principals: I) -> Self
    where
        I: IntoIterator<Item = PrincipalId>,
    {
        self.shared_with.extend(principals);
        self
    }

    /// Apply a resolved update. Fields the update leaves as `None` are untouched.
    pub fn apply_update(&mut self, update: &FileUpdate) {
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(confidential) = update.confidential {
            self.confidential = confidential;
        }
        if let Some(shared_with) = &update.shared_with {
            self.shared_with = shared_with.clone();
        }
        self.updated_at = update.updated_at;
    }
}

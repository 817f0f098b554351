//! Search filter criteria.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use medfile_core::types::{FolderId, PrincipalId, SortOrder};

/// Which kind of entry a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Folders only.
    Folders,
    /// Files only.
    Files,
}

/// Criteria combined with the search term by logical AND.
///
/// Every field defaults to "no constraint". The file-only criteria
/// (`category`, `tags`, `confidential`, `shared_with`) exclude folders from
/// the result as soon as one of them is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Category key the file must carry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tags the file must all carry.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Required confidential flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    /// Principal the file must be shared with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<PrincipalId>,
    /// Restrict results to this folder's subtree (the folder itself excluded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within: Option<FolderId>,
    /// Only entries at or under a patient folder.
    #[serde(default)]
    pub patient_only: bool,
    /// Restrict to folders or files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    /// Result ordering (folders always come first).
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchFilters {
    /// No constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require a tag (may be called repeatedly).
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Require a confidential flag.
    pub fn confidential(mut self, confidential: bool) -> Self {
        self.confidential = Some(confidential);
        self
    }

    /// Require a share with `principal`.
    pub fn shared_with(mut self, principal: PrincipalId) -> Self {
        self.shared_with = Some(principal);
        self
    }

    /// Scope to a folder subtree.
    pub fn within(mut self, folder_id: FolderId) -> Self {
        self.within = Some(folder_id);
        self
    }

    /// Only patient-folder content.
    pub fn patient_only(mut self) -> Self {
        self.patient_only = true;
        self
    }

    /// Restrict the entry kind.
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the ordering.
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a criterion that only files can satisfy is set.
    pub fn has_file_criteria(&self) -> bool {
        self.category.is_some()
            || !self.tags.is_empty()
            || self.confidential.is_some()
            || self.shared_with.is_some()
    }

    /// Whether folders can appear in the result.
    pub fn admits_folders(&self) -> bool {
        self.kind != Some(EntryKind::Files) && !self.has_file_criteria()
    }

    /// Whether files can appear in the result.
    pub fn admits_files(&self) -> bool {
        self.kind != Some(EntryKind::Folders)
    }
}

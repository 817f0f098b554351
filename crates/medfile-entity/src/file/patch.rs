//! Sparse bulk-edit patch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use medfile_core::types::PrincipalId;

/// How a bulk patch changes the share list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedWithUpdate {
    /// Unshare from everyone.
    Clear,
    /// Replace the share list with exactly these principals.
    Replace(BTreeSet<PrincipalId>),
}

/// A sparse set of field updates applied uniformly to every selected file.
///
/// An absent field means "keep current": it never overwrites what a file
/// already holds, even when the stored value is empty or `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPatch {
    /// New category key. Must exist in the configured taxonomy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tags unioned into each file's existing tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_to_add: Option<BTreeSet<String>>,
    /// New description. `Some("")` explicitly clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New confidential flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    /// Share list change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<SharedWithUpdate>,
}

impl BulkPatch {
    /// An empty patch (keeps every field).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add tags to union into each file.
    pub fn add_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_to_add
            .get_or_insert_with(BTreeSet::new)
            .extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the confidential flag.
    pub fn confidential(mut self, confidential: bool) -> Self {
        self.confidential = Some(confidential);
        self
    }

    /// Change the share list.
    pub fn shared_with(mut self, update: SharedWithUpdate) -> Self {
        self.shared_with = Some(update);
        self
    }

    /// Whether the patch sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.tags_to_add.is_none()
            && self.description.is_none()
            && self.confidential.is_none()
            && self.shared_with.is_none()
    }

    /// Tags to add with surrounding whitespace removed and blanks dropped.
    pub fn normalized_tags(&self) -> BTreeSet<String> {
        self.tags_to_add
            .iter()
            .flatten()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

//! Resolved per-file update sent to the document store.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medfile_core::types::PrincipalId;

/// The concrete field values one file changes to.
///
/// A [`super::BulkPatch`] is resolved against each target file into a
/// `FileUpdate` that carries only the fields whose value actually changes.
/// `None` always means "leave the stored value alone".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdate {
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Complete new tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New confidential flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    /// Complete new share list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<BTreeSet<PrincipalId>>,
    /// New `updated_at` timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FileUpdate {
    /// An update that changes nothing but carries the given timestamp.
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            category: None,
            tags: None,
            description: None,
            confidential: None,
            shared_with: None,
            updated_at,
        }
    }

    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.confidential.is_none()
            && self.shared_with.is_none()
    }

    /// Names of the fields this update changes.
    pub fn changed_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.category.is_some() {
            fields.push("category".to_string());
        }
        if self.tags.is_some() {
            fields.push("tags".to_string());
        }
        if self.description.is_some() {
            fields.push("description".to_string());
        }
        if self.confidential.is_some() {
            fields.push("confidential".to_string());
        }
        if self.shared_with.is_some() {
            fields.push("shared_with".to_string());
        }
        fields
    }
}

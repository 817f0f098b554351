//! Filtered, ordered projections of the hierarchy.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use medfile_core::config::taxonomy::TaxonomyConfig;
use medfile_core::error::AppError;
use medfile_core::result::AppResult;
use medfile_core::types::{FolderId, SortKey, SortOrder};
use medfile_entity::file::File;
use medfile_entity::folder::Folder;

use crate::hierarchy::Hierarchy;
use crate::hierarchy::store::by_name;

use super::filters::{EntryKind, SearchFilters};

/// One search result, borrowed from the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry<'a> {
    /// A folder.
    Folder(&'a Folder),
    /// A file.
    File(&'a File),
}

impl<'a> Entry<'a> {
    /// The entry name.
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Folder(f) => &f.name,
            Self::File(f) => &f.name,
        }
    }

    /// The entry kind.
    pub fn kind(&self) -> EntryKind {
        match *self {
            Self::Folder(_) => EntryKind::Folders,
            Self::File(_) => EntryKind::Files,
        }
    }

    /// The underlying identifier.
    pub fn uuid(&self) -> &'a Uuid {
        match *self {
            Self::Folder(f) => f.id.as_uuid(),
            Self::File(f) => f.id.as_uuid(),
        }
    }

    /// The folder holding this entry.
    pub fn parent_id(&self) -> Option<FolderId> {
        match *self {
            Self::Folder(f) => f.parent_id,
            Self::File(f) => Some(f.folder_id),
        }
    }

    /// The entry as a file, if it is one.
    pub fn as_file(&self) -> Option<&'a File> {
        match *self {
            Self::File(f) => Some(f),
            Self::Folder(_) => None,
        }
    }

    /// The entry as a folder, if it is one.
    pub fn as_folder(&self) -> Option<&'a Folder> {
        match *self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        match *self {
            Self::Folder(f) => f.created_at,
            Self::File(f) => f.created_at,
        }
    }

    fn updated_at(&self) -> DateTime<Utc> {
        match *self {
            Self::Folder(f) => f.created_at,
            Self::File(f) => f.updated_at,
        }
    }

    fn compare(&self, other: &Self, order: SortOrder) -> Ordering {
        let rank = |e: &Entry<'_>| matches!(e, Entry::File(_)) as u8;
        rank(self).cmp(&rank(other)).then_with(|| {
            let primary = match order.key {
                SortKey::Name => by_name(self.name(), other.name()),
                SortKey::CreatedAt => self.created_at().cmp(&other.created_at()),
                SortKey::UpdatedAt => self.updated_at().cmp(&other.updated_at()),
            };
            order.direction.apply(
                primary
                    .then_with(|| by_name(self.name(), other.name()))
                    .then_with(|| self.uuid().cmp(other.uuid())),
            )
        })
    }
}

/// Read-only query surface over a [`Hierarchy`].
///
/// Nothing is cached: every [`query`](Self::query) walks the hierarchy as
/// it is at that moment, so results always reflect committed mutations.
#[derive(Debug, Clone, Copy)]
pub struct SearchIndex<'a> {
    hierarchy: &'a Hierarchy,
    taxonomy: &'a TaxonomyConfig,
}

impl<'a> SearchIndex<'a> {
    /// Creates a query surface over `hierarchy`.
    pub fn new(hierarchy: &'a Hierarchy, taxonomy: &'a TaxonomyConfig) -> Self {
        Self {
            hierarchy,
            taxonomy,
        }
    }

    /// Entries whose name contains `term` (case-insensitive) and that match
    /// every filter, folders first, then in `filters.sort` order.
    ///
    /// An empty term matches every name. The root folder is never returned.
    pub fn query(&self, term: &str, filters: &SearchFilters) -> AppResult<Vec<Entry<'a>>> {
        if let Some(category) = &filters.category {
            if !self.taxonomy.contains(category) {
                return Err(AppError::validation(format!(
                    "Unknown category '{category}'"
                )));
            }
        }

        let scope: Option<HashSet<FolderId>> = match filters.within {
            Some(folder_id) => {
                if !self.hierarchy.contains_folder(folder_id) {
                    return Err(AppError::not_found(format!(
                        "Folder {folder_id} not found"
                    )));
                }
                Some(self.hierarchy.descendants(folder_id).into_iter().collect())
            }
            None => None,
        };

        let patient_scope: Option<HashSet<FolderId>> = filters.patient_only.then(|| {
            self.hierarchy
                .folders()
                .filter(|f| self.hierarchy.is_within_patient_folder(f.id))
                .map(|f| f.id)
                .collect()
        });

        let needle = term.to_lowercase();
        let name_matches = |name: &str| needle.is_empty() || name.to_lowercase().contains(&needle);
        let in_scope = |folder_id: FolderId, inclusive_of: Option<FolderId>| {
            scope
                .as_ref()
                .is_none_or(|s| s.contains(&folder_id) || Some(folder_id) == inclusive_of)
        };
        let in_patient_scope =
            |folder_id: FolderId| patient_scope.as_ref().is_none_or(|s| s.contains(&folder_id));

        let mut entries: Vec<Entry<'a>> = Vec::new();

        if filters.admits_folders() {
            entries.extend(
                self.hierarchy
                    .folders()
                    .filter(|f| !f.is_root())
                    .filter(|f| name_matches(&f.name))
                    .filter(|f| in_scope(f.id, None))
                    .filter(|f| in_patient_scope(f.id))
                    .map(Entry::Folder),
            );
        }

        if filters.admits_files() {
            entries.extend(
                self.hierarchy
                    .files()
                    .filter(|f| name_matches(&f.name))
                    .filter(|f| file_matches(f, filters))
                    .filter(|f| in_scope(f.folder_id, filters.within))
                    .filter(|f| in_patient_scope(f.folder_id))
                    .map(Entry::File),
            );
        }

        entries.sort_by(|a, b| a.compare(b, filters.sort));
        Ok(entries)
    }
}

fn file_matches(file: &File, filters: &SearchFilters) -> bool {
    filters
        .category
        .as_ref()
        .is_none_or(|c| *c == file.category)
        && filters.tags.is_subset(&file.tags)
        && filters
            .confidential
            .is_none_or(|c| c == file.confidential)
        && filters
            .shared_with
            .is_none_or(|p| file.shared_with.contains(&p))
}

//! Merge rules turning a sparse [`BulkPatch`] into a per-file [`FileUpdate`].

use chrono::{DateTime, Utc};

use medfile_entity::file::{BulkPatch, File, FileUpdate, SharedWithUpdate};

/// Resolve `patch` against `file`.
///
/// Returns `None` when applying the patch would leave the file exactly as
/// it is, so unchanged files are neither rewritten nor re-timestamped.
/// Absent patch fields never produce a field in the update; tags are
/// unioned, so resolving the same patch against its own result is `None`.
pub fn resolve_update(file: &File, patch: &BulkPatch, now: DateTime<Utc>) -> Option<FileUpdate> {
    let mut update = FileUpdate::at(now);

    if let Some(category) = &patch.category {
        if *category != file.category {
            update.category = Some(category.clone());
        }
    }

    let tags_to_add = patch.normalized_tags();
    if !tags_to_add.is_subset(&file.tags) {
        update.tags = Some(file.tags.union(&tags_to_add).cloned().collect());
    }

    if let Some(description) = &patch.description {
        if *description != file.description {
            update.description = Some(description.clone());
        }
    }

    if let Some(confidential) = patch.confidential {
        if confidential != file.confidential {
            update.confidential = Some(confidential);
        }
    }

    match &patch.shared_with {
        Some(SharedWithUpdate::Clear) if !file.shared_with.is_empty() => {
            update.shared_with = Some(Default::default());
        }
        Some(SharedWithUpdate::Replace(principals)) if *principals != file.shared_with => {
            update.shared_with = Some(principals.clone());
        }
        _ => {}
    }

    (!update.is_empty()).then_some(update)
}

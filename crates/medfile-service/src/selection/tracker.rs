//! Ordered set of selected file identifiers.

use std::collections::HashSet;

use medfile_core::types::FileId;

/// Tracks which files the user has marked for a bulk edit or move.
///
/// Holds identifiers only, never file records, and knows nothing about
/// which folder is displayed: navigating or filtering leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    /// Selected IDs in the order they were selected.
    order: Vec<FileId>,
    /// Membership index over `order`.
    members: HashSet<FileId>,
}

impl SelectionTracker {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection state of `id`. Returns the new state.
    pub fn toggle(&mut self, id: FileId) -> bool {
        if self.members.contains(&id) {
            self.deselect(id);
            false
        } else {
            self.select(id);
            true
        }
    }

    /// Select `id`. Returns `true` if it was not selected before.
    pub fn select(&mut self, id: FileId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Deselect `id`. Returns `true` if it was selected.
    pub fn deselect(&mut self, id: FileId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|selected| *selected != id);
            true
        } else {
            false
        }
    }

    /// Add every ID, keeping the given order and skipping ones already
    /// selected. Returns how many were added.
    pub fn select_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = FileId>,
    {
        ids.into_iter().filter(|id| self.select(*id)).count()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: FileId) -> bool {
        self.members.contains(&id)
    }

    /// Number of selected files.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected IDs in selection order.
    pub fn ids(&self) -> &[FileId] {
        &self.order
    }

    /// Keep only the IDs for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(FileId) -> bool,
    {
        let members = &mut self.members;
        self.order.retain(|id| {
            let kept = keep(*id);
            if !kept {
                members.remove(id);
            }
            kept
        });
    }
}

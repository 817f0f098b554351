//! Batch report returned by bulk and move operations.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::reason::FailureReason;

/// Per-item outcome of a batch: every requested identifier ends up in
/// exactly one of `succeeded` or `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct BatchReport<K> {
    /// Items that were applied (or needed no change).
    pub succeeded: BTreeSet<K>,
    /// Items that were not applied, with the reason.
    pub failed: BTreeMap<K, FailureReason>,
    /// Succeeded items that received a disambiguated name, with the new name.
    pub renamed: BTreeMap<K, String>,
}

impl<K> Default for BatchReport<K> {
    fn default() -> Self {
        Self {
            succeeded: BTreeSet::new(),
            failed: BTreeMap::new(),
            renamed: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> BatchReport<K> {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a success.
    pub fn succeed(&mut self, id: K) {
        self.failed.remove(&id);
        self.succeeded.insert(id);
    }

    /// Record a success under a new name.
    pub fn succeed_renamed(&mut self, id: K, new_name: impl Into<String>) {
        self.succeed(id);
        self.renamed.insert(id, new_name.into());
    }

    /// Record a failure.
    pub fn fail(&mut self, id: K, reason: FailureReason) {
        self.succeeded.remove(&id);
        self.renamed.remove(&id);
        self.failed.insert(id, reason);
    }

    /// Whether `id` was applied.
    pub fn is_succeeded(&self, id: &K) -> bool {
        self.succeeded.contains(id)
    }

    /// The failure reason for `id`, if it failed.
    pub fn reason(&self, id: &K) -> Option<&FailureReason> {
        self.failed.get(id)
    }

    /// Whether every item succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of items reported.
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether the report holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Bulk metadata edits across a set of files.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use medfile_core::config::taxonomy::TaxonomyConfig;
use medfile_core::error::AppError;
use medfile_core::events::FileEvent;
use medfile_core::result::AppResult;
use medfile_core::types::FileId;
use medfile_docstore::DocumentStore;
use medfile_entity::file::{BulkPatch, FileUpdate};
use medfile_entity::outcome::{BatchReport, FailureReason};

use crate::dispatch::{self, CallOutcome};
use crate::events::EventPublisher;
use crate::hierarchy::Hierarchy;

use super::merge::resolve_update;

/// Applies a [`BulkPatch`] to many files, one store call per changed file.
#[derive(Debug, Clone)]
pub struct BulkMutationEngine {
    /// Document store.
    store: Arc<dyn DocumentStore>,
    /// Valid category keys.
    taxonomy: Arc<TaxonomyConfig>,
    /// Bound on concurrently outstanding store calls.
    max_in_flight: usize,
    /// Event publisher.
    events: EventPublisher,
}

impl BulkMutationEngine {
    /// Creates a new engine.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        taxonomy: Arc<TaxonomyConfig>,
        max_in_flight: usize,
        events: EventPublisher,
    ) -> Self {
        Self {
            store,
            taxonomy,
            max_in_flight: max_in_flight.max(1),
            events,
        }
    }

    /// Apply `patch` to every file in `file_ids`.
    ///
    /// Every distinct identifier is reported exactly once. Files whose
    /// values would not change are reported as succeeded without a store
    /// call. A file the store no longer knows is evicted from `hierarchy`.
    ///
    /// Returns `Err` only when the store becomes unreachable; successes that
    /// settled before that are still applied to `hierarchy`.
    pub async fn apply(
        &self,
        hierarchy: &mut Hierarchy,
        file_ids: &[FileId],
        patch: &BulkPatch,
    ) -> AppResult<BatchReport<FileId>> {
        let mut seen = HashSet::new();
        let targets: Vec<FileId> = file_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let mut report = BatchReport::new();

        if let Some(category) = &patch.category {
            if !self.taxonomy.contains(category) {
                warn!(category = %category, files = targets.len(), "Rejecting bulk patch with unknown category");
                for id in targets {
                    if hierarchy.contains_file(id) {
                        report.fail(id, FailureReason::Validation);
                    } else {
                        report.fail(id, FailureReason::NotFound);
                    }
                }
                return Ok(report);
            }
        }

        let now = Utc::now();
        let mut jobs: Vec<(FileId, FileUpdate)> = Vec::new();
        for id in targets {
            match hierarchy.get_file(id) {
                None => report.fail(id, FailureReason::NotFound),
                Some(file) => match resolve_update(file, patch, now) {
                    None => report.succeed(id),
                    Some(update) => jobs.push((id, update)),
                },
            }
        }

        let outcomes = dispatch::settle_all(jobs, self.max_in_flight, |(id, update)| {
            let store = Arc::clone(&self.store);
            async move {
                let result = store.patch_file(id, &update).await;
                (id, update, dispatch::classify(result))
            }
        })
        .await;

        let mut fatal: Option<AppError> = None;
        for (id, update, outcome) in outcomes {
            match outcome {
                CallOutcome::Applied(stored) => {
                    if hierarchy.replace_file(stored).is_err() {
                        hierarchy.apply_file_update(id, &update);
                    }
                    self.events.publish(FileEvent::Patched {
                        file_id: id,
                        changed_fields: update.changed_fields(),
                    });
                    report.succeed(id);
                }
                CallOutcome::Failed(FailureReason::NotFound) => {
                    if hierarchy.remove_file(id).is_some() {
                        warn!(file_id = %id, "File vanished from the document store; evicted");
                        self.events.publish(FileEvent::Evicted { file_id: id });
                    }
                    report.fail(id, FailureReason::NotFound);
                }
                CallOutcome::Failed(reason) => {
                    warn!(file_id = %id, reason = %reason, "Bulk patch rejected for file");
                    report.fail(id, reason);
                }
                CallOutcome::Fatal(err) => {
                    fatal.get_or_insert(err);
                }
            }
        }

        if let Some(err) = fatal {
            warn!(
                applied = report.succeeded.len(),
                error = %err,
                "Document store became unreachable during bulk edit"
            );
            return Err(AppError::service_unavailable(format!(
                "Document store became unreachable during bulk edit ({} of {} files applied): {}",
                report.succeeded.len(),
                seen.len(),
                err.message
            )));
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Bulk patch applied"
        );

        Ok(report)
    }
}

//! Moves files and folder subtrees, validating each item independently.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use medfile_core::error::{AppError, ErrorKind};
use medfile_core::events::{FileEvent, FolderEvent};
use medfile_core::result::AppResult;
use medfile_core::types::{FileId, FolderId};
use medfile_docstore::DocumentStore;
use medfile_entity::outcome::{BatchReport, FailureReason};

use crate::dispatch::{self, CallOutcome};
use crate::events::EventPublisher;
use crate::hierarchy::Hierarchy;

use super::naming::{disambiguate_file, disambiguate_folder};

/// A file move that passed local validation.
struct PlannedFileMove {
    id: FileId,
    from: FolderId,
    name: String,
}

/// A folder move that passed local validation.
struct PlannedFolderMove {
    id: FolderId,
    from: FolderId,
    name: String,
}

trait Planned {
    fn name(&self) -> &str;
}

impl Planned for PlannedFileMove {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Planned for PlannedFolderMove {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Relocates files and folders to a destination folder.
#[derive(Debug, Clone)]
pub struct MoveEngine {
    /// Document store.
    store: Arc<dyn DocumentStore>,
    /// Bound on concurrently outstanding store calls.
    max_in_flight: usize,
    /// Event publisher.
    events: EventPublisher,
}

impl MoveEngine {
    /// Creates a new engine.
    pub fn new(store: Arc<dyn DocumentStore>, max_in_flight: usize, events: EventPublisher) -> Self {
        Self {
            store,
            max_in_flight: max_in_flight.max(1),
            events,
        }
    }

    /// Move files into `destination`.
    ///
    /// A file already in `destination` succeeds without a store call. A file
    /// whose name is taken in `destination` (including by a file the store
    /// already moved there earlier in the batch) is moved under a
    /// disambiguated name and listed in [`BatchReport::renamed`].
    pub async fn move_files(
        &self,
        hierarchy: &mut Hierarchy,
        file_ids: &[FileId],
        destination: FolderId,
    ) -> AppResult<BatchReport<FileId>> {
        let targets = dedupe(file_ids);
        let mut report = BatchReport::new();

        if !hierarchy.contains_folder(destination) {
            warn!(destination = %destination, "Move destination does not exist");
            for id in targets {
                let reason = if hierarchy.contains_file(id) {
                    FailureReason::InvalidDestination
                } else {
                    FailureReason::NotFound
                };
                report.fail(id, reason);
            }
            return Ok(report);
        }

        let mut taken = hierarchy.file_names(destination);
        let mut pending = Vec::new();
        for id in &targets {
            let Some(file) = hierarchy.get_file(*id) else {
                report.fail(*id, FailureReason::NotFound);
                continue;
            };
            if file.folder_id == destination {
                report.succeed(*id);
                continue;
            }
            pending.push(PlannedFileMove {
                id: *id,
                from: file.folder_id,
                name: file.name.clone(),
            });
        }

        let mut fatal: Option<AppError> = None;
        while !pending.is_empty() && fatal.is_none() {
            let (round, deferred) = claim_round(pending, &taken, disambiguate_file);
            pending = deferred;

            let outcomes = dispatch::settle_all(round, self.max_in_flight, |(plan, rename)| {
                let store = Arc::clone(&self.store);
                async move {
                    let result = store.move_file(plan.id, destination, rename.clone()).await;
                    (plan, rename, dispatch::classify(result))
                }
            })
            .await;

            for (plan, rename, outcome) in outcomes {
                match outcome {
                    CallOutcome::Applied(stored) => {
                        taken.insert(stored.name.clone());
                        let applied = match hierarchy.replace_file(stored) {
                            Ok(()) => Ok(()),
                            Err(_) => hierarchy.relocate_file(
                                plan.id,
                                destination,
                                rename.clone(),
                                Utc::now(),
                            ),
                        };
                        if let Err(err) = applied {
                            warn!(file_id = %plan.id, error = %err, "Moved file could not be re-indexed locally");
                        }
                        self.events.publish(FileEvent::Moved {
                            file_id: plan.id,
                            from_folder_id: plan.from,
                            to_folder_id: destination,
                            renamed_to: rename.clone(),
                        });
                        match rename {
                            Some(name) => report.succeed_renamed(plan.id, name),
                            None => report.succeed(plan.id),
                        }
                    }
                    CallOutcome::Failed(FailureReason::NotFound) => {
                        match self.explain_missing_file(hierarchy, plan.id).await {
                            Ok(reason) => report.fail(plan.id, reason),
                            Err(err) => {
                                fatal.get_or_insert(err);
                            }
                        }
                    }
                    CallOutcome::Failed(reason) => {
                        warn!(file_id = %plan.id, reason = %reason, "File move rejected");
                        report.fail(plan.id, reason);
                    }
                    CallOutcome::Fatal(err) => {
                        fatal.get_or_insert(err);
                    }
                }
            }
        }

        if let Some(err) = fatal {
            return Err(unreachable_during("file move", &report, targets.len(), &err));
        }

        info!(
            destination = %destination,
            succeeded = report.succeeded.len(),
            renamed = report.renamed.len(),
            failed = report.failed.len(),
            "Files moved"
        );

        Ok(report)
    }

    /// Move folder subtrees under `destination`.
    ///
    /// Each folder is checked on its own against the hierarchy as it stood
    /// before the batch: the root never moves, the destination path must not
    /// contain the folder, and a subtree holding a patient folder cannot land
    /// at or under another patient folder.
    pub async fn move_folders(
        &self,
        hierarchy: &mut Hierarchy,
        folder_ids: &[FolderId],
        destination: FolderId,
    ) -> AppResult<BatchReport<FolderId>> {
        let targets = dedupe(folder_ids);
        let mut report = BatchReport::new();

        if !hierarchy.contains_folder(destination) {
            warn!(destination = %destination, "Move destination does not exist");
            for id in targets {
                let reason = if hierarchy.contains_folder(id) {
                    FailureReason::InvalidDestination
                } else {
                    FailureReason::NotFound
                };
                report.fail(id, reason);
            }
            return Ok(report);
        }

        let destination_path: HashSet<FolderId> = hierarchy
            .get_path(destination)?
            .into_iter()
            .map(|f| f.id)
            .collect();
        let destination_in_patient = hierarchy.is_within_patient_folder(destination);

        let mut taken = hierarchy.folder_names(destination);
        let mut pending = Vec::new();
        for id in &targets {
            let Some(folder) = hierarchy.get_folder(*id) else {
                report.fail(*id, FailureReason::NotFound);
                continue;
            };
            let Some(parent) = folder.parent_id else {
                report.fail(*id, FailureReason::InvalidDestination);
                continue;
            };
            if destination_path.contains(id) {
                report.fail(*id, FailureReason::Cycle);
                continue;
            }
            if parent == destination {
                report.succeed(*id);
                continue;
            }
            if destination_in_patient && hierarchy.subtree_has_patient_folder(*id) {
                report.fail(*id, FailureReason::NestedPatientFolder);
                continue;
            }
            pending.push(PlannedFolderMove {
                id: *id,
                from: parent,
                name: folder.name.clone(),
            });
        }

        let mut fatal: Option<AppError> = None;
        while !pending.is_empty() && fatal.is_none() {
            let (round, deferred) = claim_round(pending, &taken, disambiguate_folder);
            pending = deferred;

            let outcomes = dispatch::settle_all(round, self.max_in_flight, |(plan, rename)| {
                let store = Arc::clone(&self.store);
                async move {
                    let result = store
                        .move_folder(plan.id, destination, rename.clone())
                        .await;
                    (plan, rename, dispatch::classify(result))
                }
            })
            .await;

            for (plan, rename, outcome) in outcomes {
                match outcome {
                    CallOutcome::Applied(stored) => {
                        taken.insert(stored.name);
                        if let Err(err) =
                            hierarchy.relocate_folder(plan.id, destination, rename.clone())
                        {
                            warn!(folder_id = %plan.id, error = %err, "Moved folder could not be re-indexed locally");
                        }
                        self.events.publish(FolderEvent::Moved {
                            folder_id: plan.id,
                            from_parent_id: plan.from,
                            to_parent_id: destination,
                            renamed_to: rename.clone(),
                        });
                        match rename {
                            Some(name) => report.succeed_renamed(plan.id, name),
                            None => report.succeed(plan.id),
                        }
                    }
                    CallOutcome::Failed(FailureReason::NotFound) => {
                        let reason = match self.store.fetch_folder(plan.id).await {
                            Ok(_) => FailureReason::InvalidDestination,
                            Err(err) if err.kind == ErrorKind::NotFound => FailureReason::NotFound,
                            Err(err) if err.is_connectivity_loss() => {
                                fatal.get_or_insert(err);
                                continue;
                            }
                            Err(err) => FailureReason::StoreRejected(err.message),
                        };
                        report.fail(plan.id, reason);
                    }
                    CallOutcome::Failed(reason) => {
                        warn!(folder_id = %plan.id, reason = %reason, "Folder move rejected");
                        report.fail(plan.id, reason);
                    }
                    CallOutcome::Fatal(err) => {
                        fatal.get_or_insert(err);
                    }
                }
            }
        }

        if let Some(err) = fatal {
            return Err(unreachable_during("folder move", &report, targets.len(), &err));
        }

        info!(
            destination = %destination,
            succeeded = report.succeeded.len(),
            renamed = report.renamed.len(),
            failed = report.failed.len(),
            "Folders moved"
        );

        Ok(report)
    }

    /// The store answered `not-found` for a file move: either the file or the
    /// destination is gone. Ask the store which one.
    async fn explain_missing_file(
        &self,
        hierarchy: &mut Hierarchy,
        id: FileId,
    ) -> AppResult<FailureReason> {
        match self.store.fetch_file(id).await {
            Ok(_) => Ok(FailureReason::InvalidDestination),
            Err(err) if err.kind == ErrorKind::NotFound => {
                if hierarchy.remove_file(id).is_some() {
                    warn!(file_id = %id, "File vanished from the document store; evicted");
                    self.events.publish(FileEvent::Evicted { file_id: id });
                }
                Ok(FailureReason::NotFound)
            }
            Err(err) if err.is_connectivity_loss() => Err(err),
            Err(err) => Ok(FailureReason::StoreRejected(err.message)),
        }
    }
}

/// Split `pending` into the moves issued now and the moves that wait.
///
/// Each issued move is named against `taken`, the names the destination
/// holds after every move the store has accepted so far. A move whose name
/// is already claimed by an earlier move of the same round waits for the
/// next round, so it is only renamed if that earlier move went through.
fn claim_round<P: Planned>(
    pending: Vec<P>,
    taken: &HashSet<String>,
    disambiguate: fn(&str, &HashSet<String>) -> String,
) -> (Vec<(P, Option<String>)>, Vec<P>) {
    let mut claimed = HashSet::new();
    let mut round = Vec::new();
    let mut deferred = Vec::new();

    for plan in pending {
        let name = disambiguate(plan.name(), taken);
        if !claimed.insert(name.clone()) {
            deferred.push(plan);
            continue;
        }
        let rename = (name != plan.name()).then_some(name);
        round.push((plan, rename));
    }

    (round, deferred)
}

/// Distinct identifiers in first-seen order.
fn dedupe<K: Copy + Eq + std::hash::Hash>(ids: &[K]) -> Vec<K> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn unreachable_during<K: Ord + Copy>(
    operation: &str,
    report: &BatchReport<K>,
    total: usize,
    err: &AppError,
) -> AppError {
    warn!(operation, applied = report.succeeded.len(), error = %err, "Document store became unreachable");
    AppError::service_unavailable(format!(
        "Document store became unreachable during {operation} ({} of {total} items applied): {}",
        report.succeeded.len(),
        err.message
    ))
}

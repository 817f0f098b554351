//! One interactive file-manager session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use medfile_core::config::AppConfig;
use medfile_core::config::taxonomy::TaxonomyConfig;
use medfile_core::error::{AppError, ErrorKind};
use medfile_core::events::{DomainEvent, FileEvent};
use medfile_core::result::AppResult;
use medfile_core::types::{FileId, FolderId};
use medfile_docstore::DocumentStore;
use medfile_entity::file::{BulkPatch, File};
use medfile_entity::folder::{Folder, FolderNode};
use medfile_entity::outcome::BatchReport;

use crate::bulk::BulkMutationEngine;
use crate::events::EventPublisher;
use crate::hierarchy::{Children, Hierarchy, HierarchyLoader};
use crate::search::{Entry, SearchFilters, SearchIndex};
use crate::selection::SelectionTracker;
use crate::transfer::MoveEngine;

use super::pending::PendingIntent;

/// Owns the hierarchy and selection of one session and runs intents
/// against them one at a time.
///
/// Every mutating method takes `&mut self`, so a second intent cannot start
/// before the first has settled.
#[derive(Debug)]
pub struct FileManager {
    /// Document store.
    store: Arc<dyn DocumentStore>,
    /// Category taxonomy.
    taxonomy: Arc<TaxonomyConfig>,
    /// Folder and file records.
    hierarchy: Hierarchy,
    /// Selected file IDs.
    selection: SelectionTracker,
    /// Folder currently displayed.
    current_folder: FolderId,
    /// Intent waiting for confirmation.
    pending: Option<PendingIntent>,
    /// Bulk metadata engine.
    bulk: BulkMutationEngine,
    /// Move engine.
    mover: MoveEngine,
    /// Event publisher.
    events: EventPublisher,
}

impl FileManager {
    /// Load the hierarchy under `root_id` from `store` and open a session on it.
    ///
    /// Fails with a service-unavailable error before loading anything when
    /// the store reports itself unreachable.
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        root_id: FolderId,
        config: &AppConfig,
    ) -> AppResult<Self> {
        if !store.health_check().await? {
            return Err(AppError::service_unavailable("Document store is not reachable"));
        }
        let hierarchy = HierarchyLoader::new(Arc::clone(&store))
            .load(root_id)
            .await?;
        Ok(Self::with_hierarchy(store, hierarchy, config))
    }

    /// Open a session on an already loaded hierarchy.
    pub fn with_hierarchy(
        store: Arc<dyn DocumentStore>,
        hierarchy: Hierarchy,
        config: &AppConfig,
    ) -> Self {
        let taxonomy = Arc::new(config.taxonomy.clone());
        let events = EventPublisher::new(config.engine.event_buffer);
        let bulk = BulkMutationEngine::new(
            Arc::clone(&store),
            Arc::clone(&taxonomy),
            config.engine.max_in_flight,
            events.clone(),
        );
        let mover = MoveEngine::new(
            Arc::clone(&store),
            config.engine.max_in_flight,
            events.clone(),
        );

        Self {
            store,
            taxonomy,
            current_folder: hierarchy.root_id(),
            hierarchy,
            selection: SelectionTracker::new(),
            pending: None,
            bulk,
            mover,
            events,
        }
    }

    /// The hierarchy.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The selection.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// The taxonomy used to validate categories.
    pub fn taxonomy(&self) -> &TaxonomyConfig {
        &self.taxonomy
    }

    /// Receive events for every change committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    /// The folder currently displayed.
    pub fn current_folder(&self) -> FolderId {
        self.current_folder
    }

    /// Display another folder. The selection is left as it is.
    pub fn navigate(&mut self, folder_id: FolderId) -> AppResult<()> {
        if !self.hierarchy.contains_folder(folder_id) {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        debug!(folder_id = %folder_id, selected = self.selection.len(), "Navigated");
        self.current_folder = folder_id;
        Ok(())
    }

    /// The path from the root to the current folder.
    pub fn breadcrumbs(&self) -> AppResult<Vec<&Folder>> {
        self.hierarchy.get_path(self.current_folder)
    }

    /// The contents of the current folder.
    pub fn list_current(&self) -> AppResult<Children<'_>> {
        self.hierarchy.list_children(self.current_folder)
    }

    /// Nested view of the current folder.
    pub fn current_tree(&self) -> AppResult<FolderNode> {
        self.hierarchy.tree(self.current_folder)
    }

    /// Flip one file's selection. Returns whether it is now selected.
    pub fn toggle(&mut self, file_id: FileId) -> bool {
        self.selection.toggle(file_id)
    }

    /// Add files to the selection. Returns how many were newly added.
    pub fn select_all(&mut self, file_ids: &[FileId]) -> usize {
        self.selection.select_all(file_ids.iter().copied())
    }

    /// Select every file directly in the current folder.
    pub fn select_visible(&mut self) -> usize {
        let visible: Vec<FileId> = self
            .hierarchy
            .files_in(self.current_folder)
            .into_iter()
            .map(|f| f.id)
            .collect();
        self.selection.select_all(visible)
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Whether a file is selected.
    pub fn is_selected(&self, file_id: FileId) -> bool {
        self.selection.is_selected(file_id)
    }

    /// Search the hierarchy as it is now.
    pub fn query(&self, term: &str, filters: &SearchFilters) -> AppResult<Vec<Entry<'_>>> {
        SearchIndex::new(&self.hierarchy, &self.taxonomy).query(term, filters)
    }

    /// Apply `patch` to `file_ids`. A fully successful batch clears the
    /// selection; after a partial one only failed files stay selected.
    pub async fn apply_bulk_patch(
        &mut self,
        file_ids: &[FileId],
        patch: &BulkPatch,
    ) -> AppResult<BatchReport<FileId>> {
        let result = self.bulk.apply(&mut self.hierarchy, file_ids, patch).await;
        self.settle_selection(result.as_ref().ok());
        result
    }

    /// Move `file_ids` into `destination`. The selection settles as for
    /// [`Self::apply_bulk_patch`].
    pub async fn move_files(
        &mut self,
        file_ids: &[FileId],
        destination: FolderId,
    ) -> AppResult<BatchReport<FileId>> {
        let result = self
            .mover
            .move_files(&mut self.hierarchy, file_ids, destination)
            .await;
        self.settle_selection(result.as_ref().ok());
        result
    }

    /// Move folder subtrees under `destination`.
    pub async fn move_folders(
        &mut self,
        folder_ids: &[FolderId],
        destination: FolderId,
    ) -> AppResult<BatchReport<FolderId>> {
        let result = self
            .mover
            .move_folders(&mut self.hierarchy, folder_ids, destination)
            .await;
        self.settle_selection(None);
        result
    }

    /// Re-read one file from the store. Returns `None` when the store no
    /// longer has it, in which case it is dropped locally.
    pub async fn refresh_file(&mut self, file_id: FileId) -> AppResult<Option<&File>> {
        match self.store.fetch_file(file_id).await {
            Ok(file) => {
                self.hierarchy.replace_file(file)?;
                Ok(self.hierarchy.get_file(file_id))
            }
            Err(err) if err.kind == ErrorKind::NotFound => {
                if self.hierarchy.remove_file(file_id).is_some() {
                    warn!(file_id = %file_id, "File vanished from the document store; evicted");
                    self.events.publish(FileEvent::Evicted { file_id });
                }
                self.selection.deselect(file_id);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Capture the selection into a pending bulk edit.
    pub fn stage_bulk_edit(&mut self, patch: BulkPatch) -> AppResult<&PendingIntent> {
        let file_ids = self.capture_selection()?;
        Ok(self.pending.insert(PendingIntent::BulkEdit { file_ids, patch }))
    }

    /// Capture the selection into a pending move.
    pub fn stage_move(&mut self, destination: FolderId) -> AppResult<&PendingIntent> {
        let file_ids = self.capture_selection()?;
        Ok(self.pending.insert(PendingIntent::Move {
            file_ids,
            destination,
        }))
    }

    /// The intent waiting for confirmation.
    pub fn pending(&self) -> Option<&PendingIntent> {
        self.pending.as_ref()
    }

    /// Discard the pending intent without touching the store.
    pub fn cancel_pending(&mut self) -> Option<PendingIntent> {
        let discarded = self.pending.take();
        if discarded.is_some() {
            debug!("Pending intent discarded");
        }
        discarded
    }

    /// Run the pending intent.
    pub async fn confirm_pending(&mut self) -> AppResult<BatchReport<FileId>> {
        let intent = self
            .pending
            .take()
            .ok_or_else(|| AppError::validation("No pending intent to confirm"))?;

        info!(files = intent.file_ids().len(), "Confirming pending intent");
        match intent {
            PendingIntent::BulkEdit { file_ids, patch } => {
                self.apply_bulk_patch(&file_ids, &patch).await
            }
            PendingIntent::Move {
                file_ids,
                destination,
            } => self.move_files(&file_ids, destination).await,
        }
    }

    fn capture_selection(&self) -> AppResult<Vec<FileId>> {
        if self.pending.is_some() {
            return Err(AppError::conflict(
                "Another intent is already waiting for confirmation",
            ));
        }
        if self.selection.is_empty() {
            return Err(AppError::validation("Nothing is selected"));
        }
        Ok(self.selection.ids().to_vec())
    }

    /// Clear the selection after a fully successful batch. Otherwise drop
    /// succeeded and evicted files and keep the rest for a retry.
    fn settle_selection(&mut self, report: Option<&BatchReport<FileId>>) {
        if report.is_some_and(BatchReport::is_complete_success) {
            self.selection.clear();
            return;
        }
        let hierarchy = &self.hierarchy;
        self.selection.retain(|id| {
            hierarchy.contains_file(id) && report.is_none_or(|r| !r.is_succeeded(&id))
        });
    }
}

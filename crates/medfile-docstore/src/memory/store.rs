//! In-memory document store backed by dashmap.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use medfile_core::error::AppError;
use medfile_core::result::AppResult;
use medfile_core::types::{FileId, FolderId};
use medfile_entity::file::{File, FileUpdate};
use medfile_entity::folder::{Folder, FolderListing};

use crate::snapshot::Snapshot;
use crate::traits::DocumentStore;

/// In-process document store.
///
/// Besides serving the CLI, it lets tests simulate a flaky backend: the
/// whole store can be taken offline, individual file calls can be made to
/// fail once, and every call can be delayed.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    /// The root folder.
    root_id: FolderId,
    /// Folders by ID.
    folders: Arc<DashMap<FolderId, Folder>>,
    /// Files by ID.
    files: Arc<DashMap<FileId, File>>,
    /// Whether the store answers at all.
    online: Arc<AtomicBool>,
    /// One-shot failures keyed by file.
    injected: Arc<DashMap<FileId, AppError>>,
    /// Artificial latency per call, in milliseconds.
    latency_ms: Arc<AtomicUsize>,
    /// Number of mutating calls received.
    mutations: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    /// Create a store holding only a root folder.
    pub fn new(root: Folder) -> AppResult<Self> {
        Self::from_snapshot(Snapshot {
            root_id: root.id,
            folders: vec![root],
            files: Vec::new(),
        })
    }

    /// Create a store from a snapshot, checking that every record hangs
    /// off an existing folder.
    pub fn from_snapshot(snapshot: Snapshot) -> AppResult<Self> {
        let folders: DashMap<FolderId, Folder> = DashMap::new();
        for folder in snapshot.folders {
            if folders.insert(folder.id, folder).is_some() {
                return Err(AppError::conflict("Snapshot contains a duplicate folder ID"));
            }
        }

        match folders.get(&snapshot.root_id) {
            Some(root) if root.is_root() => {}
            Some(_) => return Err(AppError::validation("Snapshot root folder has a parent")),
            None => return Err(AppError::validation("Snapshot root folder is missing")),
        }

        for entry in folders.iter() {
            match entry.parent_id {
                None if entry.id != snapshot.root_id => {
                    return Err(AppError::validation(format!(
                        "Folder '{}' has no parent but is not the root",
                        entry.name
                    )));
                }
                Some(parent) if !folders.contains_key(&parent) => {
                    return Err(AppError::validation(format!(
                        "Folder '{}' references a missing parent",
                        entry.name
                    )));
                }
                _ => {}
            }
        }

        let files: DashMap<FileId, File> = DashMap::new();
        for file in snapshot.files {
            if !folders.contains_key(&file.folder_id) {
                return Err(AppError::validation(format!(
                    "File '{}' references a missing folder",
                    file.name
                )));
            }
            if files.insert(file.id, file).is_some() {
                return Err(AppError::conflict("Snapshot contains a duplicate file ID"));
            }
        }

        Ok(Self {
            root_id: snapshot.root_id,
            folders: Arc::new(folders),
            files: Arc::new(files),
            online: Arc::new(AtomicBool::new(true)),
            injected: Arc::new(DashMap::new()),
            latency_ms: Arc::new(AtomicUsize::new(0)),
            mutations: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The root folder ID.
    pub fn root_id(&self) -> FolderId {
        self.root_id
    }

    /// Export the current contents as a snapshot (folders and files sorted by name).
    pub fn export_snapshot(&self) -> Snapshot {
        let mut folders: Vec<Folder> = self.folders.iter().map(|e| e.value().clone()).collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        let mut files: Vec<File> = self.files.iter().map(|e| e.value().clone()).collect();
        files.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Snapshot {
            root_id: self.root_id,
            folders,
            files,
        }
    }

    /// Insert or replace a folder directly, bypassing the trait.
    pub fn put_folder(&self, folder: Folder) {
        self.folders.insert(folder.id, folder);
    }

    /// Insert or replace a file directly, bypassing the trait.
    pub fn put_file(&self, file: File) {
        self.files.insert(file.id, file);
    }

    /// Delete a file directly, as another client would.
    pub fn remove_file(&self, id: FileId) -> Option<File> {
        self.files.remove(&id).map(|(_, file)| file)
    }

    /// Read a stored file without going through the trait.
    pub fn peek_file(&self, id: FileId) -> Option<File> {
        self.files.get(&id).map(|f| f.value().clone())
    }

    /// Read a stored folder without going through the trait.
    pub fn peek_folder(&self, id: FolderId) -> Option<Folder> {
        self.folders.get(&id).map(|f| f.value().clone())
    }

    /// Take the store offline (or back online).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Make the next mutating call for `id` fail with `error`.
    pub fn fail_next(&self, id: FileId, error: AppError) {
        self.injected.insert(id, error);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of mutating calls (`patch_file`, `move_file`, `move_folder`) received.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> AppResult<()> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency as u64)).await;
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("Document store is unreachable"));
        }
        Ok(())
    }

    async fn enter_mutation(&self, id: Option<FileId>) -> AppResult<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        if let Some(id) = id {
            if let Some((_, error)) = self.injected.remove(&id) {
                return Err(error);
            }
        }
        Ok(())
    }

    /// IDs of `folder_id` and every ancestor above it.
    fn ancestry(&self, folder_id: FolderId) -> HashSet<FolderId> {
        let mut seen = HashSet::new();
        let mut cursor = Some(folder_id);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            cursor = self.folders.get(&id).and_then(|f| f.parent_id);
        }
        seen
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.online.load(Ordering::SeqCst))
    }

    async fn fetch_folder(&self, id: FolderId) -> AppResult<Folder> {
        self.enter().await?;
        self.folders
            .get(&id)
            .map(|f| f.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn fetch_file(&self, id: FileId) -> AppResult<File> {
        self.enter().await?;
        self.files
            .get(&id)
            .map(|f| f.value().clone())
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn fetch_children(&self, folder_id: FolderId) -> AppResult<FolderListing> {
        self.enter().await?;
        if !self.folders.contains_key(&folder_id) {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|f| f.parent_id == Some(folder_id))
            .map(|f| f.value().clone())
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));

        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .map(|f| f.value().clone())
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(FolderListing { folders, files })
    }

    async fn patch_file(&self, id: FileId, update: &FileUpdate) -> AppResult<File> {
        self.enter_mutation(Some(id)).await?;
        let mut file = self
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.apply_update(update);
        debug!(file_id = %id, fields = ?update.changed_fields(), "Stored file patched");
        Ok(file.value().clone())
    }

    async fn move_file(
        &self,
        id: FileId,
        destination: FolderId,
        new_name: Option<String>,
    ) -> AppResult<File> {
        self.enter_mutation(Some(id)).await?;
        if !self.folders.contains_key(&destination) {
            return Err(AppError::not_found(format!(
                "Destination folder {destination} not found"
            )));
        }
        let mut file = self
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.folder_id = destination;
        if let Some(name) = new_name {
            file.name = name;
        }
        file.updated_at = Utc::now();
        Ok(file.value().clone())
    }

    async fn move_folder(
        &self,
        id: FolderId,
        destination: FolderId,
        new_name: Option<String>,
    ) -> AppResult<Folder> {
        self.enter_mutation(None).await?;
        if !self.folders.contains_key(&destination) {
            return Err(AppError::not_found(format!(
                "Destination folder {destination} not found"
            )));
        }
        if self.ancestry(destination).contains(&id) {
            return Err(AppError::validation(
                "Cannot move a folder into one of its descendants",
            ));
        }
        let mut folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if folder.is_root() {
            return Err(AppError::validation("The root folder cannot be moved"));
        }
        folder.parent_id = Some(destination);
        if let Some(name) = new_name {
            folder.name = name;
        }
        Ok(folder.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medfile_core::error::ErrorKind;

    fn make_store() -> (MemoryDocumentStore, Folder, Folder, File) {
        let root = Folder::root("Practice");
        let labs = Folder::new(root.id, "Labs");
        let file = File::new(labs.id, "cbc.pdf", "lab");
        let store = MemoryDocumentStore::from_snapshot(Snapshot {
            root_id: root.id,
            folders: vec![root.clone(), labs.clone()],
            files: vec![file.clone()],
        })
        .expect("valid snapshot");
        (store, root, labs, file)
    }

    #[tokio::test]
    async fn test_fetch_children() {
        let (store, root, labs, file) = make_store();
        let listing = store.fetch_children(root.id).await.unwrap();
        assert_eq!(listing.folders.len(), 1);
        assert!(listing.files.is_empty());
        let listing = store.fetch_children(labs.id).await.unwrap();
        assert_eq!(listing.files[0].id, file.id);
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let (store, root, _, _) = make_store();
        store.set_online(false);
        let err = store.fetch_folder(root.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert!(!store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let (store, _, _, file) = make_store();
        store.fail_next(file.id, AppError::internal("locked"));
        let update = FileUpdate {
            confidential: Some(true),
            ..FileUpdate::at(Utc::now())
        };
        assert!(store.patch_file(file.id, &update).await.is_err());
        let patched = store.patch_file(file.id, &update).await.unwrap();
        assert!(patched.confidential);
        assert_eq!(store.mutation_count(), 2);
    }

    #[tokio::test]
    async fn test_move_folder_into_descendant_rejected() {
        let (store, root, labs, _) = make_store();
        let inner = Folder::new(labs.id, "2024");
        store.put_folder(inner.clone());
        let err = store.move_folder(labs.id, inner.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = store.move_folder(root.id, labs.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_orphan_file_rejected() {
        let root = Folder::root("Practice");
        let orphan = File::new(FolderId::new(), "lost.pdf", "other");
        let err = MemoryDocumentStore::from_snapshot(Snapshot {
            root_id: root.id,
            folders: vec![root],
            files: vec![orphan],
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

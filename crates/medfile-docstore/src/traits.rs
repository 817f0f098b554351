//! Document store trait.

use async_trait::async_trait;

use medfile_core::result::AppResult;
use medfile_core::types::{FileId, FolderId};
use medfile_entity::file::{File, FileUpdate};
use medfile_entity::folder::{Folder, FolderListing};

/// Persistence API for folders and files.
///
/// Implementations report a missing record with `ErrorKind::NotFound` and
/// an unreachable backend with `ErrorKind::ServiceUnavailable`. Any other
/// error is a refusal of that individual record.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Fetch a folder by ID.
    async fn fetch_folder(&self, id: FolderId) -> AppResult<Folder>;

    /// Fetch a file by ID.
    async fn fetch_file(&self, id: FileId) -> AppResult<File>;

    /// Fetch the folders and files directly under a folder.
    async fn fetch_children(&self, folder_id: FolderId) -> AppResult<FolderListing>;

    /// Apply a resolved update to one file and return the stored record.
    async fn patch_file(&self, id: FileId, update: &FileUpdate) -> AppResult<File>;

    /// Move one file into `destination`, optionally renaming it.
    async fn move_file(
        &self,
        id: FileId,
        destination: FolderId,
        new_name: Option<String>,
    ) -> AppResult<File>;

    /// Move one folder (with its subtree) under `destination`, optionally renaming it.
    async fn move_folder(
        &self,
        id: FolderId,
        destination: FolderId,
        new_name: Option<String>,
    ) -> AppResult<Folder>;
}

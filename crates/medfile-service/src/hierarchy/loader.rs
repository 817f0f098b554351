//! Builds a [`Hierarchy`] from the document store.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{info, warn};

use medfile_core::error::AppError;
use medfile_core::result::AppResult;
use medfile_core::types::FolderId;
use medfile_docstore::DocumentStore;

use super::store::Hierarchy;

/// Loads the folder/file hierarchy breadth-first with `fetch_children`.
#[derive(Debug, Clone)]
pub struct HierarchyLoader {
    /// Document store.
    store: Arc<dyn DocumentStore>,
}

impl HierarchyLoader {
    /// Creates a new loader.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Loads everything reachable from `root_id`.
    ///
    /// A folder reported under two parents, or reported again further down,
    /// is kept at its first position and skipped afterwards.
    pub async fn load(&self, root_id: FolderId) -> AppResult<Hierarchy> {
        let root = self.store.fetch_folder(root_id).await?;
        if !root.is_root() {
            return Err(AppError::validation(format!(
                "Folder '{}' is not a root folder",
                root.name
            )));
        }

        let mut hierarchy = Hierarchy::new(root)?;
        let mut queue = VecDeque::from([root_id]);
        let mut visited = HashSet::from([root_id]);

        while let Some(folder_id) = queue.pop_front() {
            let listing = self.store.fetch_children(folder_id).await?;

            for folder in listing.folders {
                if folder.parent_id != Some(folder_id) {
                    warn!(
                        folder_id = %folder.id,
                        listed_under = %folder_id,
                        "Skipping folder listed under a parent it does not reference"
                    );
                    continue;
                }
                if !visited.insert(folder.id) {
                    warn!(folder_id = %folder.id, "Skipping folder already loaded");
                    continue;
                }
                queue.push_back(folder.id);
                hierarchy.insert_folder(folder)?;
            }

            for file in listing.files {
                if file.folder_id != folder_id {
                    warn!(
                        file_id = %file.id,
                        listed_under = %folder_id,
                        "Skipping file listed under a folder it does not reference"
                    );
                    continue;
                }
                if hierarchy.contains_file(file.id) {
                    warn!(file_id = %file.id, "Skipping file already loaded");
                    continue;
                }
                hierarchy.insert_file(file)?;
            }
        }

        info!(
            root_id = %root_id,
            folders = hierarchy.folder_count(),
            files = hierarchy.file_count(),
            "Hierarchy loaded"
        );

        Ok(hierarchy)
    }
}

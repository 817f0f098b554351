//! Nested folder tree building.

use medfile_core::error::AppError;
use medfile_core::result::AppResult;
use medfile_core::types::FolderId;
use medfile_entity::folder::{Folder, FolderNode};

use super::store::Hierarchy;

impl Hierarchy {
    /// Builds the folder tree rooted at `folder_id`, with per-folder file counts.
    pub fn tree(&self, folder_id: FolderId) -> AppResult<FolderNode> {
        let root = self
            .get_folder(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        Ok(self.build_node(root, self.files_in(folder_id).len(), 0))
    }

    fn build_node(&self, folder: &Folder, file_count: usize, depth: usize) -> FolderNode {
        let children = self
            .list_children(folder.id)
            .map(|c| {
                c.folders
                    .into_iter()
                    .map(|child| {
                        let count = self.files_in(child.id).len();
                        self.build_node(child, count, depth + 1)
                    })
                    .collect()
            })
            .unwrap_or_default();

        FolderNode {
            id: folder.id,
            name: folder.name.clone(),
            is_patient_folder: folder.is_patient_folder,
            depth,
            file_count,
            children,
        }
    }
}

//! Arena of folders and files indexed by identifier.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use medfile_core::error::AppError;
use medfile_core::result::AppResult;
use medfile_core::types::{FileId, FolderId};
use medfile_entity::file::{File, FileUpdate};
use medfile_entity::folder::Folder;

/// The folders and files directly under one folder, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct Children<'a> {
    /// Child folders.
    pub folders: Vec<&'a Folder>,
    /// Files in the folder.
    pub files: Vec<&'a File>,
}

impl Children<'_> {
    /// Whether the folder is empty.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// The single source of truth for folder and file records.
///
/// Invariants held at all times:
/// - exactly one folder (the root) has no parent;
/// - every parent chain reaches the root without repeating a folder;
/// - every file's `folder_id` names a folder in the arena.
///
/// Reads are pure projections. Mutation is reserved to the engines in
/// this crate.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    /// The root folder.
    root_id: FolderId,
    /// Folders by ID.
    folders: HashMap<FolderId, Folder>,
    /// Files by ID.
    files: HashMap<FileId, File>,
    /// Child folders of each folder.
    child_folders: HashMap<FolderId, HashSet<FolderId>>,
    /// Files directly in each folder.
    folder_files: HashMap<FolderId, HashSet<FileId>>,
}

pub(crate) fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

impl Hierarchy {
    /// Create a hierarchy holding only `root`.
    pub fn new(root: Folder) -> AppResult<Self> {
        if !root.is_root() {
            return Err(AppError::validation("The root folder cannot have a parent"));
        }
        let root_id = root.id;
        let mut folders = HashMap::new();
        folders.insert(root_id, root);
        let mut child_folders = HashMap::new();
        child_folders.insert(root_id, HashSet::new());
        let mut folder_files = HashMap::new();
        folder_files.insert(root_id, HashSet::new());

        Ok(Self {
            root_id,
            folders,
            files: HashMap::new(),
            child_folders,
            folder_files,
        })
    }

    /// The root folder ID.
    pub fn root_id(&self) -> FolderId {
        self.root_id
    }

    /// Add a folder under an existing parent.
    pub fn insert_folder(&mut self, folder: Folder) -> AppResult<()> {
        if self.folders.contains_key(&folder.id) {
            return Err(AppError::conflict(format!(
                "Folder {} already exists",
                folder.id
            )));
        }
        let parent_id = folder
            .parent_id
            .ok_or_else(|| AppError::conflict("The hierarchy already has a root folder"))?;
        if !self.folders.contains_key(&parent_id) {
            return Err(AppError::not_found(format!(
                "Parent folder {parent_id} not found"
            )));
        }

        self.child_folders
            .entry(parent_id)
            .or_default()
            .insert(folder.id);
        self.child_folders.insert(folder.id, HashSet::new());
        self.folder_files.insert(folder.id, HashSet::new());
        self.folders.insert(folder.id, folder);
        Ok(())
    }

    /// Add a file to an existing folder.
    pub fn insert_file(&mut self, file: File) -> AppResult<()> {
        if self.files.contains_key(&file.id) {
            return Err(AppError::conflict(format!("File {} already exists", file.id)));
        }
        if !self.folders.contains_key(&file.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found for file '{}'",
                file.folder_id, file.name
            )));
        }
        self.folder_files
            .entry(file.folder_id)
            .or_default()
            .insert(file.id);
        self.files.insert(file.id, file);
        Ok(())
    }

    /// Look up a folder.
    pub fn get_folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Look up a file.
    pub fn get_file(&self, id: FileId) -> Option<&File> {
        self.files.get(&id)
    }

    /// Whether the folder exists.
    pub fn contains_folder(&self, id: FolderId) -> bool {
        self.folders.contains_key(&id)
    }

    /// Whether the file exists.
    pub fn contains_file(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    /// Number of folders, root included.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// All folders, in no particular order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    /// All files, in no particular order.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// The folders and files directly under `folder_id`.
    pub fn list_children(&self, folder_id: FolderId) -> AppResult<Children<'_>> {
        if !self.folders.contains_key(&folder_id) {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        let mut folders: Vec<&Folder> = self
            .child_folders
            .get(&folder_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.folders.get(id))
            .collect();
        folders.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));

        let mut files: Vec<&File> = self
            .folder_files
            .get(&folder_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.files.get(id))
            .collect();
        files.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));

        Ok(Children { folders, files })
    }

    /// Files directly in `folder_id` (empty when the folder is unknown).
    pub fn files_in(&self, folder_id: FolderId) -> Vec<&File> {
        self.list_children(folder_id)
            .map(|c| c.files)
            .unwrap_or_default()
    }

    /// The ancestors of `folder_id`, root first, ending with the folder itself.
    ///
    /// The walk is bounded by the number of folders, so a corrupted parent
    /// chain is reported instead of looping.
    pub fn get_path(&self, folder_id: FolderId) -> AppResult<Vec<&Folder>> {
        let mut path = Vec::new();
        let mut cursor = Some(folder_id);

        while let Some(id) = cursor {
            if path.len() > self.folders.len() {
                return Err(AppError::internal(format!(
                    "Parent chain of folder {folder_id} does not terminate"
                )));
            }
            let folder = self
                .folders
                .get(&id)
                .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
            path.push(folder);
            cursor = folder.parent_id;
        }

        path.reverse();
        Ok(path)
    }

    /// Whether `ancestor` is `folder_id` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: FolderId, folder_id: FolderId) -> bool {
        self.get_path(folder_id)
            .map(|path| path.iter().any(|f| f.id == ancestor))
            .unwrap_or(false)
    }

    /// Whether the folder, or any folder above it, is a patient folder.
    pub fn is_within_patient_folder(&self, folder_id: FolderId) -> bool {
        self.get_path(folder_id)
            .map(|path| path.iter().any(|f| f.is_patient_folder))
            .unwrap_or(false)
    }

    /// Every folder below `folder_id` (not including it), breadth first.
    pub fn descendants(&self, folder_id: FolderId) -> Vec<FolderId> {
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::from([folder_id]);
        let mut seen = HashSet::from([folder_id]);

        while let Some(id) = queue.pop_front() {
            for child in self.child_folders.get(&id).into_iter().flatten() {
                if seen.insert(*child) {
                    result.push(*child);
                    queue.push_back(*child);
                }
            }
        }
        result
    }

    /// Whether the subtree rooted at `folder_id` contains a patient folder.
    pub fn subtree_has_patient_folder(&self, folder_id: FolderId) -> bool {
        std::iter::once(folder_id)
            .chain(self.descendants(folder_id))
            .filter_map(|id| self.folders.get(&id))
            .any(|f| f.is_patient_folder)
    }

    /// Names of the files directly in `folder_id`.
    pub fn file_names(&self, folder_id: FolderId) -> HashSet<String> {
        self.folder_files
            .get(&folder_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.files.get(id))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Names of the folders directly under `folder_id`.
    pub fn folder_names(&self, folder_id: FolderId) -> HashSet<String> {
        self.child_folders
            .get(&folder_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.folders.get(id))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Apply a resolved update to a stored file. Returns `false` when the
    /// file is unknown.
    pub(crate) fn apply_file_update(&mut self, id: FileId, update: &FileUpdate) -> bool {
        match self.files.get_mut(&id) {
            Some(file) => {
                file.apply_update(update);
                true
            }
            None => false,
        }
    }

    /// Move a file into `destination`, optionally renaming it.
    pub(crate) fn relocate_file(
        &mut self,
        id: FileId,
        destination: FolderId,
        new_name: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if !self.folders.contains_key(&destination) {
            return Err(AppError::not_found(format!(
                "Destination folder {destination} not found"
            )));
        }
        let file = self
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

        let previous = file.folder_id;
        file.folder_id = destination;
        if let Some(name) = new_name {
            file.name = name;
        }
        file.updated_at = updated_at;

        if let Some(set) = self.folder_files.get_mut(&previous) {
            set.remove(&id);
        }
        self.folder_files.entry(destination).or_default().insert(id);
        Ok(())
    }

    /// Re-parent a folder (with its subtree), optionally renaming it.
    pub(crate) fn relocate_folder(
        &mut self,
        id: FolderId,
        new_parent: FolderId,
        new_name: Option<String>,
    ) -> AppResult<()> {
        if !self.folders.contains_key(&new_parent) {
            return Err(AppError::not_found(format!(
                "Destination folder {new_parent} not found"
            )));
        }
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(AppError::internal(format!(
                "Relocating folder {id} under {new_parent} would create a cycle"
            )));
        }
        let folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        let previous = folder
            .parent_id
            .ok_or_else(|| AppError::validation("The root folder cannot be moved"))?;

        folder.parent_id = Some(new_parent);
        if let Some(name) = new_name {
            folder.name = name;
        }

        if let Some(set) = self.child_folders.get_mut(&previous) {
            set.remove(&id);
        }
        self.child_folders.entry(new_parent).or_default().insert(id);
        Ok(())
    }

    /// Replace a file record with a fresher copy, re-indexing it if it
    /// changed folders. A copy pointing at an unknown folder is rejected.
    pub(crate) fn replace_file(&mut self, file: File) -> AppResult<()> {
        if !self.folders.contains_key(&file.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found for file '{}'",
                file.folder_id, file.name
            )));
        }
        if let Some(previous) = self.files.get(&file.id) {
            if let Some(set) = self.folder_files.get_mut(&previous.folder_id) {
                set.remove(&file.id);
            }
        }
        self.folder_files
            .entry(file.folder_id)
            .or_default()
            .insert(file.id);
        self.files.insert(file.id, file);
        Ok(())
    }

    /// Drop a file that no longer exists in the document store.
    pub(crate) fn remove_file(&mut self, id: FileId) -> Option<File> {
        let file = self.files.remove(&id)?;
        if let Some(set) = self.folder_files.get_mut(&file.folder_id) {
            set.remove(&id);
        }
        Some(file)
    }
}

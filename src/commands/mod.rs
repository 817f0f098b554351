//! CLI command definitions and dispatch.

pub mod browse;
pub mod config;
pub mod edit;
pub mod search;
pub mod transfer;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use medfile_core::config::AppConfig;
use medfile_core::error::AppError;
use medfile_core::types::{FileId, FolderId};
use medfile_docstore::{MemoryDocumentStore, Snapshot};
use medfile_service::FileManager;

use crate::output::{self, OutputFormat};

/// MedFile: clinical practice file manager
#[derive(Debug, Parser)]
#[command(name = "medfile", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay file (merged over config/default.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Hierarchy snapshot (defaults to docstore.snapshot_path)
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the folder tree
    Tree(browse::TreeArgs),
    /// List a folder's contents
    Ls(browse::LsArgs),
    /// Show the path from the root to a folder
    Path(browse::PathArgs),
    /// Search folders and files
    Search(search::SearchArgs),
    /// Apply a metadata patch to several files
    BulkEdit(edit::BulkEditArgs),
    /// Move files into a folder
    Move(transfer::MoveArgs),
    /// Move folders under another folder
    MoveFolder(transfer::MoveFolderArgs),
    /// Show or validate the configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &config, self.format),
            command => {
                let snapshot_path = self
                    .snapshot
                    .clone()
                    .unwrap_or_else(|| config.docstore.snapshot_path.clone());
                let mut session = Session::open(&snapshot_path, &config).await?;

                match command {
                    Commands::Tree(args) => browse::tree(args, &session, self.format),
                    Commands::Ls(args) => browse::ls(args, &session, self.format),
                    Commands::Path(args) => browse::path(args, &session, self.format),
                    Commands::Search(args) => search::execute(args, &session, self.format),
                    Commands::BulkEdit(args) => {
                        edit::execute(args, &mut session, self.format).await
                    }
                    Commands::Move(args) => {
                        transfer::move_files(args, &mut session, self.format).await
                    }
                    Commands::MoveFolder(args) => {
                        transfer::move_folders(args, &mut session, self.format).await
                    }
                    Commands::Config(_) => Ok(()),
                }
            }
        }
    }
}

/// A file manager opened over a snapshot file.
pub struct Session {
    /// Where the snapshot came from.
    pub snapshot_path: String,
    /// The backing store.
    pub store: MemoryDocumentStore,
    /// The file manager.
    pub manager: FileManager,
}

impl Session {
    /// Load the snapshot and open a file manager on it.
    pub async fn open(snapshot_path: &str, config: &AppConfig) -> Result<Self, AppError> {
        let snapshot = Snapshot::read_from(snapshot_path).await?;
        let root_id = snapshot.root_id;
        let store = MemoryDocumentStore::from_snapshot(snapshot)?;
        let manager = FileManager::open(Arc::new(store.clone()), root_id, config).await?;

        Ok(Self {
            snapshot_path: snapshot_path.to_string(),
            store,
            manager,
        })
    }

    /// Write the store's current state back to the snapshot file.
    pub async fn save(&self) -> Result<(), AppError> {
        self.store
            .export_snapshot()
            .write_to(&self.snapshot_path)
            .await?;
        info!(path = %self.snapshot_path, "Snapshot written");
        output::print_success(&format!("Snapshot saved to '{}'", self.snapshot_path));
        Ok(())
    }

    /// Resolve a folder given by ID or by a `/`-separated name path from
    /// the root (`/` alone is the root).
    pub fn resolve_folder(&self, reference: &str) -> Result<FolderId, AppError> {
        let hierarchy = self.manager.hierarchy();
        if let Ok(id) = reference.parse::<FolderId>() {
            return hierarchy
                .contains_folder(id)
                .then_some(id)
                .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")));
        }

        let mut current = hierarchy.root_id();
        for segment in reference.split('/').filter(|s| !s.is_empty()) {
            current = hierarchy
                .list_children(current)?
                .folders
                .into_iter()
                .find(|f| f.name == segment)
                .map(|f| f.id)
                .ok_or_else(|| AppError::not_found(format!("No folder named '{segment}'")))?;
        }
        Ok(current)
    }

    /// Resolve a file given by ID or by `folder/path/file-name`.
    pub fn resolve_file(&self, reference: &str) -> Result<FileId, AppError> {
        if let Ok(id) = reference.parse::<FileId>() {
            return Ok(id);
        }

        let (folder, name) = match reference.rsplit_once('/') {
            Some((folder, name)) => (self.resolve_folder(folder)?, name),
            None => (self.manager.hierarchy().root_id(), reference),
        };
        self.manager
            .hierarchy()
            .files_in(folder)
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.id)
            .ok_or_else(|| AppError::not_found(format!("No file named '{name}'")))
    }

    /// Display name of a file (or its ID when unknown).
    pub fn file_label(&self, id: FileId) -> String {
        self.manager
            .hierarchy()
            .get_file(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Display name of a folder (or its ID when unknown).
    pub fn folder_label(&self, id: FolderId) -> String {
        self.manager
            .hierarchy()
            .get_folder(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

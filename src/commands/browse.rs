//! Read-only navigation commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use medfile_core::error::AppError;
use medfile_entity::file::File;
use medfile_entity::folder::{Folder, FolderNode};

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Folder to start from (ID or path)
    #[arg(default_value = "/")]
    pub folder: String,
    /// Max depth
    #[arg(short, long)]
    pub depth: Option<usize>,
}

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder to list (ID or path)
    #[arg(default_value = "/")]
    pub folder: String,
}

/// Arguments for `path`
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Folder (ID or path)
    pub folder: String,
}

/// Folder or file display row
#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    /// "folder", "patient", or "file"
    pub kind: String,
    /// Name
    pub name: String,
    /// ID
    pub id: String,
    /// Category (files only)
    pub category: String,
    /// Tags (files only)
    pub tags: String,
    /// Confidential flag (files only)
    pub confidential: String,
    /// Last update
    pub updated_at: String,
}

impl From<&Folder> for EntryRow {
    fn from(folder: &Folder) -> Self {
        Self {
            kind: if folder.is_patient_folder {
                "patient".to_string()
            } else {
                "folder".to_string()
            },
            name: format!("{}/", folder.name),
            id: folder.id.to_string(),
            category: String::new(),
            tags: String::new(),
            confidential: String::new(),
            updated_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl From<&File> for EntryRow {
    fn from(file: &File) -> Self {
        Self {
            kind: "file".to_string(),
            name: file.name.clone(),
            id: file.id.to_string(),
            category: file.category.clone(),
            tags: file.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            confidential: if file.confidential { "yes" } else { "no" }.to_string(),
            updated_at: file.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Print the folder tree
pub fn tree(args: &TreeArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let folder_id = session.resolve_folder(&args.folder)?;
    let node = session.manager.hierarchy().tree(folder_id)?;

    match format {
        OutputFormat::Json => output::print_json(&node),
        OutputFormat::Table => {
            println!("{}/ ({} files)", node.name, node.file_count);
            print_children(&node, "", args.depth.unwrap_or(usize::MAX));
            println!(
                "\n{} folders, {} files",
                node.total_folders(),
                node.total_files()
            );
        }
    }
    Ok(())
}

fn print_children(node: &FolderNode, prefix: &str, max_depth: usize) {
    if node.depth >= max_depth {
        return;
    }
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let marker = if child.is_patient_folder { " [patient]" } else { "" };
        println!(
            "{}{} {}/{} ({} files)",
            prefix,
            if last { "└──" } else { "├──" },
            child.name,
            marker,
            child.file_count
        );
        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        print_children(child, &next, max_depth);
    }
}

/// List one folder
pub fn ls(args: &LsArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let folder_id = session.resolve_folder(&args.folder)?;
    let children = session.manager.hierarchy().list_children(folder_id)?;

    let mut rows: Vec<EntryRow> = children.folders.into_iter().map(EntryRow::from).collect();
    rows.extend(children.files.into_iter().map(EntryRow::from));
    output::print_list(&rows, format);
    Ok(())
}

/// Print the breadcrumb path of a folder
pub fn path(args: &PathArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let folder_id = session.resolve_folder(&args.folder)?;
    let path = session.manager.hierarchy().get_path(folder_id)?;

    match format {
        OutputFormat::Json => output::print_json(&path),
        OutputFormat::Table => {
            let names: Vec<&str> = path.iter().skip(1).map(|f| f.name.as_str()).collect();
            println!("/{}", names.join("/"));
            if session.manager.hierarchy().is_within_patient_folder(folder_id) {
                output::print_kv("Patient scope", "yes");
            }
        }
    }
    Ok(())
}

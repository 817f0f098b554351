//! Move commands.

use clap::Args;

use medfile_core::error::AppError;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for `move`
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Files to move (IDs or `folder/path/name`)
    #[arg(required = true)]
    pub files: Vec<String>,
    /// Destination folder (ID or path)
    #[arg(long)]
    pub to: String,
    /// Save the resulting snapshot
    #[arg(long)]
    pub write: bool,
}

/// Arguments for `move-folder`
#[derive(Debug, Args)]
pub struct MoveFolderArgs {
    /// Folders to move (IDs or paths)
    #[arg(required = true)]
    pub folders: Vec<String>,
    /// Destination folder (ID or path)
    #[arg(long)]
    pub to: String,
    /// Save the resulting snapshot
    #[arg(long)]
    pub write: bool,
}

/// Move files
pub async fn move_files(
    args: &MoveArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let file_ids = args
        .files
        .iter()
        .map(|f| session.resolve_file(f))
        .collect::<Result<Vec<_>, _>>()?;
    let destination = session.resolve_folder(&args.to)?;

    session.manager.select_all(&file_ids);
    session.manager.stage_move(destination)?;
    let report = session.manager.confirm_pending().await?;

    output::print_report(&report, format, |id| session.file_label(id));
    if args.write {
        session.save().await?;
    }
    Ok(())
}

/// Move folders
pub async fn move_folders(
    args: &MoveFolderArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let folder_ids = args
        .folders
        .iter()
        .map(|f| session.resolve_folder(f))
        .collect::<Result<Vec<_>, _>>()?;
    let destination = session.resolve_folder(&args.to)?;

    let report = session
        .manager
        .move_folders(&folder_ids, destination)
        .await?;

    output::print_report(&report, format, |id| session.folder_label(id));
    if args.write {
        session.save().await?;
    }
    Ok(())
}

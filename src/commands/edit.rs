//! Bulk metadata edit command.

use std::collections::BTreeSet;

use clap::Args;

use medfile_core::error::AppError;
use medfile_core::types::PrincipalId;
use medfile_entity::file::{BulkPatch, SharedWithUpdate};

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for `bulk-edit`
#[derive(Debug, Args)]
pub struct BulkEditArgs {
    /// Files to edit (IDs or `folder/path/name`)
    #[arg(required = true)]
    pub files: Vec<String>,
    /// New category key
    #[arg(long)]
    pub category: Option<String>,
    /// Tag to add (repeatable)
    #[arg(long = "add-tag")]
    pub add_tags: Vec<String>,
    /// New description (an empty string clears it)
    #[arg(long)]
    pub description: Option<String>,
    /// New confidential flag
    #[arg(long)]
    pub confidential: Option<bool>,
    /// Share with exactly these principals (repeatable)
    #[arg(long = "share-with", conflicts_with = "unshare")]
    pub share_with: Vec<String>,
    /// Unshare from everyone
    #[arg(long)]
    pub unshare: bool,
    /// Save the resulting snapshot
    #[arg(long)]
    pub write: bool,
}

/// Execute bulk edit
pub async fn execute(
    args: &BulkEditArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let file_ids = args
        .files
        .iter()
        .map(|f| session.resolve_file(f))
        .collect::<Result<Vec<_>, _>>()?;
    let patch = build_patch(args)?;

    session.manager.select_all(&file_ids);
    session.manager.stage_bulk_edit(patch)?;
    let report = session.manager.confirm_pending().await?;

    output::print_report(&report, format, |id| session.file_label(id));
    if args.write {
        session.save().await?;
    }
    Ok(())
}

fn build_patch(args: &BulkEditArgs) -> Result<BulkPatch, AppError> {
    let mut patch = BulkPatch::new();
    if let Some(category) = &args.category {
        patch = patch.category(category.clone());
    }
    if !args.add_tags.is_empty() {
        patch = patch.add_tags(args.add_tags.iter().cloned());
    }
    if let Some(description) = &args.description {
        patch = patch.description(description.clone());
    }
    if let Some(confidential) = args.confidential {
        patch = patch.confidential(confidential);
    }
    if args.unshare {
        patch = patch.shared_with(SharedWithUpdate::Clear);
    } else if !args.share_with.is_empty() {
        let principals = args
            .share_with
            .iter()
            .map(|p| {
                p.parse::<PrincipalId>()
                    .map_err(|e| AppError::validation(format!("Invalid principal ID '{p}': {e}")))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        patch = patch.shared_with(SharedWithUpdate::Replace(principals));
    }
    Ok(patch)
}

//! Search command.

use clap::Args;

use medfile_core::error::AppError;
use medfile_core::types::{PrincipalId, SortDirection, SortKey, SortOrder};
use medfile_service::{Entry, EntryKind, SearchFilters};

use super::Session;
use super::browse::EntryRow;
use crate::output::{self, OutputFormat};

/// Arguments for `search`
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive name fragment (empty matches everything)
    #[arg(default_value = "")]
    pub term: String,
    /// Category key
    #[arg(long)]
    pub category: Option<String>,
    /// Required tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Confidential flag
    #[arg(long)]
    pub confidential: Option<bool>,
    /// Principal the file is shared with
    #[arg(long)]
    pub shared_with: Option<String>,
    /// Restrict to a folder subtree (ID or path)
    #[arg(long)]
    pub within: Option<String>,
    /// Only patient-folder content
    #[arg(long)]
    pub patient_only: bool,
    /// Only folders
    #[arg(long, conflicts_with = "files")]
    pub folders: bool,
    /// Only files
    #[arg(long)]
    pub files: bool,
    /// Sort key
    #[arg(long, value_parser = ["name", "created_at", "updated_at"], default_value = "name")]
    pub sort: String,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

/// Execute search
pub fn execute(args: &SearchArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let filters = build_filters(args, session)?;
    let entries = session.manager.query(&args.term, &filters)?;

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| match *entry {
            Entry::Folder(folder) => EntryRow::from(folder),
            Entry::File(file) => EntryRow::from(file),
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}

fn build_filters(args: &SearchArgs, session: &Session) -> Result<SearchFilters, AppError> {
    let key = match args.sort.as_str() {
        "created_at" => SortKey::CreatedAt,
        "updated_at" => SortKey::UpdatedAt,
        _ => SortKey::Name,
    };
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let mut filters = SearchFilters::new().sort(SortOrder::new(key, direction));
    filters.category = args.category.clone();
    filters.tags = args.tags.iter().cloned().collect();
    filters.confidential = args.confidential;
    filters.patient_only = args.patient_only;
    if let Some(principal) = &args.shared_with {
        let principal: PrincipalId = principal
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid principal ID: {e}")))?;
        filters.shared_with = Some(principal);
    }
    if let Some(within) = &args.within {
        filters.within = Some(session.resolve_folder(within)?);
    }
    if args.folders {
        filters.kind = Some(EntryKind::Folders);
    } else if args.files {
        filters.kind = Some(EntryKind::Files);
    }
    Ok(filters)
}

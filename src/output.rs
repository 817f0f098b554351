//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use medfile_entity::outcome::{BatchReport, FailureReason};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item as JSON regardless of format
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{}", json);
}

/// One row of a batch report table
#[derive(Debug, Serialize, Tabled)]
struct OutcomeRow {
    /// Item ID
    id: String,
    /// Item name
    name: String,
    /// "ok", "renamed", or the failure code
    outcome: String,
    /// New name or failure detail
    detail: String,
}

/// Print a batch report, naming each item with `name_of`
pub fn print_report<K, F>(report: &BatchReport<K>, format: OutputFormat, name_of: F)
where
    K: Ord + Copy + Serialize + std::fmt::Display,
    F: Fn(K) -> String,
{
    if format == OutputFormat::Json {
        print_json(report);
        return;
    }

    let mut rows: Vec<OutcomeRow> = report
        .succeeded
        .iter()
        .map(|id| match report.renamed.get(id) {
            Some(new_name) => OutcomeRow {
                id: id.to_string(),
                name: name_of(*id),
                outcome: "renamed".to_string(),
                detail: new_name.clone(),
            },
            None => OutcomeRow {
                id: id.to_string(),
                name: name_of(*id),
                outcome: "ok".to_string(),
                detail: String::new(),
            },
        })
        .collect();
    rows.extend(report.failed.iter().map(|(id, reason)| OutcomeRow {
        id: id.to_string(),
        name: name_of(*id),
        outcome: reason.code().to_string(),
        detail: match reason {
            FailureReason::StoreRejected(message) => message.clone(),
            _ => String::new(),
        },
    }));

    print_list(&rows, format);

    if report.is_complete_success() {
        print_success(&format!("{} item(s) applied", report.succeeded.len()));
    } else {
        print_warning(&format!(
            "{} applied, {} failed",
            report.succeeded.len(),
            report.failed.len()
        ));
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

//! Configuration inspection commands.

use clap::{Args, Subcommand};

use medfile_core::config::AppConfig;
use medfile_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration and summarize it
    Validate,
    /// List the category taxonomy
    Categories,
}

/// Category display row
#[derive(Debug, serde::Serialize, tabled::Tabled)]
struct CategoryRow {
    /// Key
    key: String,
    /// Label
    label: String,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_json(config),
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success("Configuration is valid");
            output::print_kv("Log level", &config.logging.level);
            output::print_kv("Log format", &config.logging.format);
            output::print_kv("Categories", &config.taxonomy.categories.len().to_string());
            output::print_kv("Max in flight", &config.engine.max_in_flight.to_string());
            output::print_kv("Snapshot", &config.docstore.snapshot_path);
        }
        ConfigCommand::Categories => {
            let rows: Vec<CategoryRow> = config
                .taxonomy
                .categories
                .iter()
                .map(|c| CategoryRow {
                    key: c.key.clone(),
                    label: c.label.clone(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has defaults so an empty file is valid.

pub mod docstore;
pub mod engine;
pub mod logging;
pub mod taxonomy;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use self::docstore::DocStoreConfig;
use self::engine::EngineConfig;
use self::logging::LoggingConfig;
use self::taxonomy::TaxonomyConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Category taxonomy.
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    /// Engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Document store settings.
    #[serde(default)]
    pub docstore: DocStoreConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` (if present), then the optional overlay
    /// file, then environment variables prefixed with `MEDFILE_`
    /// (e.g. `MEDFILE_ENGINE__MAX_IN_FLIGHT=4`).
    pub fn load(overlay: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = overlay {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("MEDFILE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engines cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.taxonomy.categories.is_empty() {
            return Err(AppError::configuration(
                "taxonomy.categories must list at least one category",
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.taxonomy.categories {
            if category.key.trim().is_empty() {
                return Err(AppError::configuration("Category keys cannot be empty"));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate category key '{}'",
                    category.key
                )));
            }
        }

        if self.engine.max_in_flight == 0 {
            return Err(AppError::configuration(
                "engine.max_in_flight must be at least 1",
            ));
        }
        if self.engine.event_buffer == 0 {
            return Err(AppError::configuration(
                "engine.event_buffer must be at least 1",
            ));
        }

        Ok(())
    }
}

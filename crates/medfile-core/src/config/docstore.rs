//! Document store settings.

use serde::{Deserialize, Serialize};

/// Where the in-process document store reads its snapshot from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocStoreConfig {
    /// Path to a JSON snapshot of folders and files.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for DocStoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/snapshot.json".to_string()
}

//! Bulk and move engine settings.

use serde::{Deserialize, Serialize};

/// Tuning for the mutation engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of per-item document-store calls in flight at once.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Capacity of the domain event broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_max_in_flight() -> usize {
    8
}

fn default_event_buffer() -> usize {
    256
}

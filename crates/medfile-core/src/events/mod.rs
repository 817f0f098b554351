//! Domain events emitted by committed file manager operations.
//!
//! Events are published on a broadcast channel and consumed by the
//! notification/UI layer. They describe what changed, never why.

pub mod file;
pub mod folder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use file::FileEvent;
pub use folder::FolderEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A file-related event.
    File(FileEvent),
    /// A folder-related event.
    Folder(FolderEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

impl From<FileEvent> for DomainEvent {
    fn from(event: FileEvent) -> Self {
        Self::new(EventPayload::File(event))
    }
}

impl From<FolderEvent> for DomainEvent {
    fn from(event: FolderEvent) -> Self {
        Self::new(EventPayload::Folder(event))
    }
}

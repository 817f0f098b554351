//! # medfile-service
//!
//! The file manager core. A [`Hierarchy`] owns every folder and file
//! record; the [`SelectionTracker`] holds identifiers only; the
//! [`BulkMutationEngine`] and [`MoveEngine`] mutate the hierarchy through
//! the document store and report per-item outcomes; the [`SearchIndex`]
//! derives filtered listings on every call.
//!
//! [`FileManager`] ties these together for one interactive session and
//! serializes intents through `&mut self`.

pub mod bulk;
pub mod dispatch;
pub mod events;
pub mod hierarchy;
pub mod manager;
pub mod search;
pub mod selection;
pub mod transfer;

pub use bulk::BulkMutationEngine;
pub use events::EventPublisher;
pub use hierarchy::{Children, Hierarchy, HierarchyLoader};
pub use manager::{FileManager, PendingIntent};
pub use search::{Entry, EntryKind, SearchFilters, SearchIndex};
pub use selection::SelectionTracker;
pub use transfer::MoveEngine;

//! Search and filter over the live hierarchy.

pub mod filters;
pub mod index;

pub use filters::{EntryKind, SearchFilters};
pub use index::{Entry, SearchIndex};

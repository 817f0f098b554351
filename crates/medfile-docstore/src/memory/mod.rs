//! In-memory document store.

pub mod store;

pub use store::MemoryDocumentStore;

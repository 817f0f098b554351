//! # medfile-docstore
//!
//! The document store is the external collaborator that persists folders
//! and files. This crate defines the [`DocumentStore`] trait the engines
//! talk to, plus [`MemoryDocumentStore`], an in-process implementation
//! backed by a JSON [`Snapshot`].

pub mod memory;
pub mod snapshot;
pub mod traits;

pub use memory::MemoryDocumentStore;
pub use snapshot::Snapshot;
pub use traits::DocumentStore;

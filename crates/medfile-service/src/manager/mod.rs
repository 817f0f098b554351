//! The session façade tying hierarchy, selection, and engines together.

pub mod pending;
pub mod service;

pub use pending::PendingIntent;
pub use service::FileManager;

//! Per-item outcomes of bulk and move operations.

pub mod reason;
pub mod report;

pub use reason::FailureReason;
pub use report::BatchReport;

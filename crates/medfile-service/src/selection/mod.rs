//! Multi-select state.

pub mod tracker;

pub use tracker::SelectionTracker;

//! Moving files and folder subtrees between folders.

pub mod engine;
pub mod naming;

pub use engine::MoveEngine;

//! # medfile-entity
//!
//! Domain records for the practice file manager. Every struct in this
//! crate is either a record owned by the folder/file hierarchy or a value
//! object describing an intent (patches) or an outcome (batch reports).
//! All of them derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod file;
pub mod folder;
pub mod outcome;

//! Why a single item of a batch was not applied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recoverable per-item failure reported in a [`super::BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "message", rename_all = "kebab-case")]
pub enum FailureReason {
    /// The referenced file or folder no longer exists.
    NotFound,
    /// The destination folder is missing or cannot receive the item.
    InvalidDestination,
    /// The folder would be moved into itself or one of its descendants.
    Cycle,
    /// A patient folder would end up inside another patient folder.
    NestedPatientFolder,
    /// The patch failed validation (e.g. unknown category).
    Validation,
    /// The document store refused this record for another reason.
    StoreRejected(String),
}

impl FailureReason {
    /// The stable kebab-case code of this reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::InvalidDestination => "invalid-destination",
            Self::Cycle => "cycle",
            Self::NestedPatientFolder => "nested-patient-folder",
            Self::Validation => "validation",
            Self::StoreRejected(_) => "store-rejected",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreRejected(message) => write!(f, "store-rejected: {message}"),
            other => f.write_str(other.code()),
        }
    }
}

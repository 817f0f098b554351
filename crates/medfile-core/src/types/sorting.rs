//! Sorting types for listings and search results.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// The attribute entries are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Case-insensitive name.
    #[default]
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Last update timestamp (folders fall back to creation time).
    UpdatedAt,
}

/// A sort specification consisting of a key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    /// What to sort by.
    #[serde(default)]
    pub key: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    /// Create a new sort order.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Create an ascending sort on the given key.
    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    /// Create a descending sort on the given key.
    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

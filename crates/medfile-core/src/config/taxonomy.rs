//! Document category taxonomy.
//!
//! The set of categories a file may carry is configuration, not code.
//! Bulk patches and search filters are validated against it.

use serde::{Deserialize, Serialize};

/// One category in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Stable key stored on files (e.g. `"lab"`).
    pub key: String,
    /// Human-readable label (e.g. `"Lab Results"`).
    pub label: String,
}

/// The fixed, enumerated list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Known categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryDef>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl TaxonomyConfig {
    /// Build a taxonomy from bare keys, using each key as its label.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: keys
                .into_iter()
                .map(|k| {
                    let key = k.into();
                    CategoryDef {
                        label: key.clone(),
                        key,
                    }
                })
                .collect(),
        }
    }

    /// Whether `key` names a configured category.
    pub fn contains(&self, key: &str) -> bool {
        self.categories.iter().any(|c| c.key == key)
    }

    /// Look up the label for a category key.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.as_str())
    }

    /// All configured keys, in configuration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }
}

fn default_categories() -> Vec<CategoryDef> {
    [
        ("lab", "Lab Results"),
        ("imaging", "Imaging"),
        ("prescription", "Prescriptions"),
        ("clinical-notes", "Clinical Notes"),
        ("consent", "Consent Forms"),
        ("referral", "Referrals"),
        ("insurance", "Insurance"),
        ("invoice", "Invoices"),
        ("admin", "Administrative"),
        ("other", "Other"),
    ]
    .into_iter()
    .map(|(key, label)| CategoryDef {
        key: key.to_string(),
        label: label.to_string(),
    })
    .collect()
}

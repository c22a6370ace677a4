//! Label taxonomy mapping detector labels to severity categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Severity categories that a detection label can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Exposed intimate body parts.
    Explicit,
    /// Covered intimate areas or otherwise suggestive content.
    Suggestive,
    /// Content with no risk semantics (faces, extremities).
    Benign,
    /// Labels the taxonomy does not know about; excluded from scoring.
    Unknown,
}

impl Category {
    /// Returns a human-readable name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Explicit => "Explicit",
            Category::Suggestive => "Suggestive",
            Category::Benign => "Benign",
            Category::Unknown => "Unknown",
        }
    }
}

/// Label-to-category lookup table.
///
/// The taxonomy is configuration data, not code: severity groupings get
/// revised repeatedly, so labels live in a map that can be extended
/// without touching the aggregation math. Every known label maps to
/// exactly one category; anything else resolves to [`Category::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    labels: BTreeMap<String, Category>,
}

/// Default label table for NudeNet-style detectors.
const DEFAULT_LABELS: &[(&str, Category)] = &[
    ("FEMALE_GENITALIA_EXPOSED", Category::Explicit),
    ("MALE_GENITALIA_EXPOSED", Category::Explicit),
    ("FEMALE_BREAST_EXPOSED", Category::Explicit),
    ("BUTTOCKS_EXPOSED", Category::Explicit),
    ("ANUS_EXPOSED", Category::Explicit),
    ("FEMALE_GENITALIA_COVERED", Category::Suggestive),
    ("FEMALE_BREAST_COVERED", Category::Suggestive),
    ("BUTTOCKS_COVERED", Category::Suggestive),
    ("ANUS_COVERED", Category::Suggestive),
    ("MALE_BREAST_EXPOSED", Category::Suggestive),
    ("BELLY_EXPOSED", Category::Suggestive),
    ("FACE_FEMALE", Category::Benign),
    ("FACE_MALE", Category::Benign),
    ("BELLY_COVERED", Category::Benign),
    ("FEET_EXPOSED", Category::Benign),
    ("FEET_COVERED", Category::Benign),
    ("ARMPITS_EXPOSED", Category::Benign),
    ("ARMPITS_COVERED", Category::Benign),
];

impl Taxonomy {
    /// Creates an empty taxonomy (everything resolves to `Unknown`).
    pub fn empty() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Creates the default taxonomy for NudeNet-style detector labels.
    pub fn with_defaults() -> Self {
        let labels = DEFAULT_LABELS
            .iter()
            .map(|(label, category)| (label.to_string(), *category))
            .collect();
        Self { labels }
    }

    /// Assigns a label to a category, replacing any previous assignment.
    pub fn assign(&mut self, label: impl Into<String>, category: Category) {
        self.labels.insert(label.into(), category);
    }

    /// Looks up the category for a detector label.
    ///
    /// Total function: labels the table does not know resolve to
    /// [`Category::Unknown`] rather than failing.
    pub fn categorize(&self, label: &str) -> Category {
        self.labels
            .get(label)
            .copied()
            .unwrap_or(Category::Unknown)
    }

    /// Returns the number of known labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no labels are mapped.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

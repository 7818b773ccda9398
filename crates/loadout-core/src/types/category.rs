//! Category labels and their user-defined priority.
//!
//! Categories only bias the order of packages that have no direct ordering
//! relation between them. They never override a declared constraint.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Rank given to categories missing from the priority list (and to blank ones)
pub const UNLISTED_RANK: usize = usize::MAX;

/// Categories every installation starts with
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "core",
    "dlc",
    "framework",
    "logic",
    "feature",
    "race",
    "race-extension",
    "single-feature",
    "translation",
    "optimization",
];

/// Ordered category preference, most preferred first
///
/// Duplicate entries keep the index of their first occurrence; blank entries
/// never rank anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryPriority {
    ranks: IndexMap<String, usize>,
}

impl CategoryPriority {
    /// Build a priority table from an ordered list of labels
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks = IndexMap::new();
        for (index, category) in categories.into_iter().enumerate() {
            let category = category.into();
            if category.trim().is_empty() {
                continue;
            }
            ranks.entry(category).or_insert(index);
        }
        Self { ranks }
    }

    /// Rank of a category; lower sorts first
    pub fn rank(&self, category: &str) -> usize {
        if category.trim().is_empty() {
            return UNLISTED_RANK;
        }
        self.ranks.get(category).copied().unwrap_or(UNLISTED_RANK)
    }

    /// Whether the category appears in the list
    pub fn contains(&self, category: &str) -> bool {
        self.ranks.contains_key(category)
    }

    /// Listed categories in priority order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.ranks.keys().map(String::as_str)
    }

    /// Number of distinct listed categories
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if no category is listed
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl From<Vec<String>> for CategoryPriority {
    fn from(categories: Vec<String>) -> Self {
        Self::new(categories)
    }
}

impl From<CategoryPriority> for Vec<String> {
    fn from(priority: CategoryPriority) -> Self {
        priority.ranks.into_keys().collect()
    }
}

/// Known category labels: the defaults plus user-defined ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    custom: IndexSet<String>,
}

impl CategoryRegistry {
    /// Create a registry with only the default categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given custom categories
    pub fn with_custom<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.set_custom(custom);
        registry
    }

    /// All categories, defaults first
    pub fn all(&self) -> Vec<&str> {
        DEFAULT_CATEGORIES
            .iter()
            .copied()
            .chain(self.custom.iter().map(String::as_str))
            .collect()
    }

    /// Custom categories in the order they were added
    pub fn custom(&self) -> impl Iterator<Item = &str> {
        self.custom.iter().map(String::as_str)
    }

    /// Add a custom category
    ///
    /// Returns `false` for blank labels, defaults and labels already present.
    pub fn add_custom(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        if category.trim().is_empty() || Self::is_default(&category) {
            return false;
        }
        self.custom.insert(category)
    }

    /// Remove a custom category; defaults cannot be removed
    pub fn remove_custom(&mut self, category: &str) -> bool {
        if Self::is_default(category) {
            return false;
        }
        self.custom.shift_remove(category)
    }

    /// Replace every custom category
    pub fn set_custom<I, S>(&mut self, custom: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom.clear();
        for category in custom {
            self.add_custom(category);
        }
    }

    /// Drop all custom categories
    pub fn reset(&mut self) {
        self.custom.clear();
    }

    /// Whether the label is known
    pub fn contains(&self, category: &str) -> bool {
        Self::is_default(category) || self.custom.contains(category)
    }

    /// Whether the label is one of the defaults
    pub fn is_default(category: &str) -> bool {
        DEFAULT_CATEGORIES.contains(&category)
    }
}

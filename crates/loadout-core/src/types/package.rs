//! Package records.
//!
//! Defines the declared ordering relationships of one mod as read from its
//! metadata. The resolver never mutates a package.

use serde::{Deserialize, Serialize};

use super::PackageId;

/// One mod/content unit and its declared relationships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,

    /// Human-readable name, if the metadata carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form category label; empty means uncategorized
    #[serde(default)]
    pub category: String,

    /// User note shown next to the package; never affects ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,

    /// Packages that must load before this one
    #[serde(default, alias = "dependencies")]
    pub requires: Vec<PackageId>,

    /// Packages this one must follow, if present
    #[serde(default, alias = "loadAfter")]
    pub load_after: Vec<PackageId>,

    /// Packages this one must precede, if present
    #[serde(default, alias = "loadBefore")]
    pub load_before: Vec<PackageId>,

    /// Packages that cannot be active together with this one
    #[serde(default, alias = "incompatibleWith")]
    pub incompatible_with: Vec<PackageId>,
}

impl Package {
    /// Create a package with no category and no relationships
    pub fn new(id: impl Into<PackageId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            category: String::new(),
            remark: None,
            requires: Vec::new(),
            load_after: Vec::new(),
            load_before: Vec::new(),
            incompatible_with: Vec::new(),
        }
    }

    /// Set the category label
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Add a hard dependency
    pub fn requires(mut self, id: impl Into<PackageId>) -> Self {
        push_unique(&mut self.requires, id.into());
        self
    }

    /// Add a load-after hint
    pub fn load_after(mut self, id: impl Into<PackageId>) -> Self {
        push_unique(&mut self.load_after, id.into());
        self
    }

    /// Add a load-before hint
    pub fn load_before(mut self, id: impl Into<PackageId>) -> Self {
        push_unique(&mut self.load_before, id.into());
        self
    }

    /// Declare an incompatibility
    pub fn incompatible_with(mut self, id: impl Into<PackageId>) -> Self {
        push_unique(&mut self.incompatible_with, id.into());
        self
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Ids that must precede this package (`requires` then `load_after`)
    pub fn predecessors(&self) -> impl Iterator<Item = &PackageId> {
        self.requires.iter().chain(self.load_after.iter())
    }

    /// Whether this package declares that `other` must come before it
    pub fn must_follow(&self, other: &PackageId) -> bool {
        other != &self.id && self.predecessors().any(|id| id == other)
    }

    /// Whether this package declares that it must come before `other`
    pub fn must_precede(&self, other: &PackageId) -> bool {
        other != &self.id && self.load_before.iter().any(|id| id == other)
    }

    /// Whether either package declares a direct ordering relation on the other
    pub fn is_ordered_with(&self, other: &Package) -> bool {
        self.must_follow(&other.id)
            || self.must_precede(&other.id)
            || other.must_follow(&self.id)
            || other.must_precede(&self.id)
    }

    /// Whether either package declares the other incompatible
    pub fn conflicts_with(&self, other: &Package) -> bool {
        self.id != other.id
            && (self.incompatible_with.contains(&other.id)
                || other.incompatible_with.contains(&self.id))
    }

    /// Check if this package has a usable id
    pub fn is_valid(&self) -> bool {
        !self.id.is_blank()
    }
}

fn push_unique(list: &mut Vec<PackageId>, id: PackageId) {
    if !id.is_blank() && !list.contains(&id) {
        list.push(id);
    }
}

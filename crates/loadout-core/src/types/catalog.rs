//! The package catalog handed to a resolution call.
//!
//! A catalog is an insertion-ordered snapshot keyed by folded package id.
//! Insertion order is the tie-breaker for every deterministic choice the
//! resolver makes, so it is preserved exactly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Package, PackageId};
use crate::utils::hash::ContentHasher;

/// Ordered, de-duplicated collection of packages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Package>", into = "Vec<Package>")]
pub struct Catalog {
    packages: IndexMap<PackageId, Package>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from packages in the given order
    ///
    /// When two packages share a folded id the first one is kept.
    pub fn from_packages(packages: impl IntoIterator<Item = Package>) -> Self {
        let mut catalog = Self::new();
        for package in packages {
            catalog.insert(package);
        }
        catalog
    }

    /// Insert a package at the end of the catalog
    ///
    /// Returns `false` (and leaves the catalog untouched) when the id is blank
    /// or already present.
    pub fn insert(&mut self, package: Package) -> bool {
        if !package.is_valid() {
            warn!("Ignoring package with blank id");
            return false;
        }

        if let Some(existing) = self.packages.get(&package.id) {
            warn!(
                "Duplicate package id '{}' (already present as '{}'), keeping the first",
                package.id, existing.id
            );
            return false;
        }

        self.packages.insert(package.id.clone(), package);
        true
    }

    /// Get a package by id
    pub fn get(&self, id: &PackageId) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Get a package by its position in the catalog
    pub fn get_index(&self, index: usize) -> Option<&Package> {
        self.packages.get_index(index).map(|(_, package)| package)
    }

    /// Position of a package in insertion order
    pub fn position(&self, id: &PackageId) -> Option<usize> {
        self.packages.get_index_of(id)
    }

    /// Check whether a package is present
    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    /// Iterate packages in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Iterate ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &PackageId> {
        self.packages.keys()
    }

    /// Number of distinct packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Content hash of the snapshot
    ///
    /// Covers folded ids, categories and relationships in catalog order.
    /// Display names and remarks do not take part.
    pub fn fingerprint(&self) -> String {
        let mut hasher = ContentHasher::new();
        hasher.count(self.len());
        for package in self.iter() {
            hasher.field(package.id.key());
            hasher.field(&package.category);
            for list in [
                &package.requires,
                &package.load_after,
                &package.load_before,
                &package.incompatible_with,
            ] {
                hasher.count(list.len());
                for id in list {
                    hasher.field(id.key());
                }
            }
        }
        hasher.finish()
    }
}

impl FromIterator<Package> for Catalog {
    fn from_iter<T: IntoIterator<Item = Package>>(iter: T) -> Self {
        Self::from_packages(iter)
    }
}

impl From<Vec<Package>> for Catalog {
    fn from(packages: Vec<Package>) -> Self {
        Self::from_packages(packages)
    }
}

impl From<Catalog> for Vec<Package> {
    fn from(catalog: Catalog) -> Self {
        catalog.packages.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Package;
    type IntoIter = indexmap::map::Values<'a, PackageId, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.values()
    }
}

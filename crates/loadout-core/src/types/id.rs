//! Case-insensitive package identifiers.
//!
//! Mod authors are inconsistent about casing (`Ludeon.RimWorld` vs
//! `ludeon.rimworld`), so identity is decided on the lowercase fold while the
//! original spelling is kept for output.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Unique identifier for a package
///
/// Equality, hashing and ordering all use the folded key, so `Core.Mod` and
/// `core.mod` are the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageId {
    /// Identifier as it was written
    raw: String,
    /// Lowercase fold used for every comparison
    key: String,
}

impl PackageId {
    /// Create a new package id
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = fold(&raw);
        Self { raw, key }
    }

    /// The identifier as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The folded comparison key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the identifier has no visible characters
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Fold an identifier to its comparison key
fn fold(id: &str) -> String {
    id.to_lowercase()
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for PackageId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for PackageId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_case_insensitive_equality() {
        let a = PackageId::new("Core.Mod");
        let b = PackageId::new("core.mod");

        assert_eq!(a, b);
        assert_eq!(a.key(), "core.mod");
        assert_eq!(a.as_str(), "Core.Mod");
        assert_eq!(b.as_str(), "core.mod");
    }

    #[test]
    fn test_hash_uses_fold() {
        let mut set = HashSet::new();
        set.insert(PackageId::new("Ludeon.RimWorld"));
        set.insert(PackageId::new("LUDEON.RIMWORLD"));

        assert_eq!(set.len(), 1);
        assert!(set.contains(&PackageId::from("ludeon.rimworld")));
    }

    #[test]
    fn test_display_keeps_spelling() {
        let id = PackageId::new("Brrainz.Harmony");
        assert_eq!(id.to_string(), "Brrainz.Harmony");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = PackageId::new("Core.Mod");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Core.Mod\"");

        let back: PackageId = serde_json::from_str("\"CORE.mod\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(back.as_str(), "CORE.mod");
    }

    #[test]
    fn test_blank() {
        assert!(PackageId::new("").is_blank());
        assert!(PackageId::new("   ").is_blank());
        assert!(!PackageId::new("a").is_blank());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn case_changes_keep_identity(raw in "[A-Za-z0-9._-]{0,24}") {
                let id = PackageId::new(raw.clone());
                prop_assert_eq!(&id, &PackageId::new(raw.to_uppercase()));
                prop_assert_eq!(&id, &PackageId::new(raw.to_lowercase()));
                prop_assert_eq!(id.as_str(), raw.as_str());
            }

            #[test]
            fn ordering_follows_folded_key(a in "[A-Za-z]{1,8}", b in "[A-Za-z]{1,8}") {
                let (left, right) = (PackageId::new(a.clone()), PackageId::new(b.clone()));
                prop_assert_eq!(left.cmp(&right), a.to_lowercase().cmp(&b.to_lowercase()));
            }
        }
    }
}

//! Incompatibility diagnostics
//!
//! `incompatible_with` never creates ordering edges. It only matters when
//! both packages are present in the same catalog, which is what this module
//! reports.

use std::fmt;

use serde::Serialize;

use loadout_core::types::{Catalog, PackageId};

/// Two present packages that cannot be active together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incompatibility {
    /// Package earlier in the catalog
    pub first: PackageId,
    /// Package later in the catalog
    pub second: PackageId,
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is incompatible with {}", self.first, self.second)
    }
}

/// Every incompatible pair present in the catalog
///
/// A pair is listed once no matter which side (or both) declares it, ordered
/// by the catalog position of `first`, then of `second`.
pub fn find_incompatibilities(catalog: &Catalog) -> Vec<Incompatibility> {
    let mut pairs: Vec<(usize, usize)> = Vec::new();

    for (index, package) in catalog.iter().enumerate() {
        for declared in &package.incompatible_with {
            let Some(other) = catalog.get(declared) else {
                continue;
            };
            if !package.conflicts_with(other) {
                continue;
            }
            let Some(position) = catalog.position(&other.id) else {
                continue;
            };

            let pair = (index.min(position), index.max(position));
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
    }

    pairs.sort_unstable();
    pairs
        .into_iter()
        .filter_map(|(first, second)| {
            Some(Incompatibility {
                first: catalog.get_index(first)?.id.clone(),
                second: catalog.get_index(second)?.id.clone(),
            })
        })
        .collect()
}

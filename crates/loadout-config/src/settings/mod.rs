//! loadout.toml settings parsing and validation

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::{debug, warn};

use loadout_core::error::LoadoutError;
use loadout_core::types::{Catalog, CategoryPriority, CategoryRegistry, Package, PackageId};

use crate::{parse_toml, ConfigResult};

/// Complete loadout.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadoutToml {
    /// Category preference used by the priority pass
    pub priority: PrioritySection,

    /// User-defined categories on top of the defaults
    pub categories: CategoriesSection,

    /// Where the package catalog lives
    pub catalog: CatalogSection,

    /// Resolution behavior
    pub resolve: ResolveSection,

    /// Per-package category and remark assignments, keyed by package id
    pub packages: BTreeMap<String, PackageOverride>,
}

/// `[priority]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrioritySection {
    /// Category labels, most preferred first
    pub categories: Vec<String>,
}

/// `[categories]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoriesSection {
    /// Custom category labels
    pub custom: Vec<String>,
}

/// `[catalog]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Catalog file, relative to the settings file that names it
    pub path: Option<Utf8PathBuf>,
}

/// `[resolve]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolveSection {
    /// Fail on cycles instead of returning a best-effort order
    pub strict: Option<bool>,
}

/// `[packages."<id>"]` entry
///
/// Catalog metadata rarely carries a category, so users assign one here.
/// Blank values leave the catalog's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageOverride {
    /// Category replacing the catalog's label
    pub category: Option<String>,

    /// Free-form note
    pub remark: Option<String>,
}

impl PackageOverride {
    /// Layer `other` on top; its set fields win
    pub fn merge(&mut self, other: PackageOverride) {
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.remark.is_some() {
            self.remark = other.remark;
        }
    }

    /// Write the set, non-blank fields into `package`
    fn apply(&self, package: &mut Package) -> bool {
        let mut changed = false;
        if let Some(category) = non_blank(&self.category) {
            package.category = category.to_string();
            changed = true;
        }
        if let Some(remark) = non_blank(&self.remark) {
            package.remark = Some(remark.to_string());
            changed = true;
        }
        changed
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl LoadoutToml {
    /// Priority table for the resolver
    pub fn category_priority(&self) -> CategoryPriority {
        CategoryPriority::new(self.priority.categories.iter().cloned())
    }

    /// Default categories plus the configured custom ones
    pub fn registry(&self) -> CategoryRegistry {
        CategoryRegistry::with_custom(self.categories.custom.iter().cloned())
    }

    /// Whether cycles should fail resolution
    pub fn is_strict(&self) -> bool {
        self.resolve.strict.unwrap_or(false)
    }

    /// Layer `other`'s package entries on top of these
    ///
    /// Keys are matched case-insensitively; the layered entry takes the
    /// spelling of `other`.
    pub fn merge_packages(&mut self, other: BTreeMap<String, PackageOverride>) {
        for (key, entry) in other {
            let id = PackageId::new(key.as_str());
            let mut merged = PackageOverride::default();
            let existing: Vec<String> = self
                .packages
                .keys()
                .filter(|k| PackageId::new(k.as_str()) == id)
                .cloned()
                .collect();
            for old in existing {
                if let Some(previous) = self.packages.remove(&old) {
                    merged.merge(previous);
                }
            }
            merged.merge(entry);
            self.packages.insert(key, merged);
        }
    }

    /// A new catalog snapshot with the `[packages]` assignments applied
    ///
    /// Entries for ids missing from the catalog are skipped.
    pub fn apply_package_overrides(&self, catalog: &Catalog) -> Catalog {
        if self.packages.is_empty() {
            return catalog.clone();
        }

        let mut lookup: HashMap<PackageId, &PackageOverride> = HashMap::new();
        for (key, entry) in &self.packages {
            lookup.entry(PackageId::new(key.as_str())).or_insert(entry);
        }

        let mut applied = 0usize;
        let annotated: Catalog = catalog
            .iter()
            .map(|package| {
                let mut package = package.clone();
                if let Some(entry) = lookup.get(&package.id) {
                    if entry.apply(&mut package) {
                        applied += 1;
                    }
                }
                package
            })
            .collect();

        for id in lookup.keys().filter(|id| !catalog.contains(id)) {
            debug!(id = %id, "Package assignment names a package missing from the catalog");
        }
        debug!(applied, entries = lookup.len(), "Applied package assignments");
        annotated
    }

    /// Resolve a relative catalog path against `base`
    pub fn rebase_catalog_path(&mut self, base: &Utf8Path) {
        if let Some(path) = &self.catalog.path {
            if path.is_relative() {
                self.catalog.path = Some(base.join(path));
            }
        }
    }
}

/// Parse TOML string to LoadoutToml configuration
pub fn parse_loadout_toml(content: &str) -> ConfigResult<LoadoutToml> {
    parse_settings("loadout.toml", content)
}

fn parse_settings(file: &str, content: &str) -> ConfigResult<LoadoutToml> {
    let config: LoadoutToml = parse_toml(file, content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
///
/// Hard errors are reserved for values nothing could make sense of. Priority
/// entries naming unknown categories only warn, since a catalog may use
/// labels the registry was never told about.
pub fn validate_config(config: &LoadoutToml) -> ConfigResult<()> {
    if let Some(path) = &config.catalog.path {
        if path.as_str().trim().is_empty() {
            return Err(LoadoutError::invalid("catalog.path", "must not be empty"));
        }
    }

    if config.categories.custom.iter().any(|c| c.trim().is_empty()) {
        return Err(LoadoutError::invalid(
            "categories.custom",
            "category labels must not be empty",
        ));
    }

    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for key in config.packages.keys() {
        if key.trim().is_empty() {
            return Err(LoadoutError::invalid("packages", "package ids must not be empty"));
        }
        match seen.entry(PackageId::new(key.as_str()).key().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(key.as_str());
            },
            Entry::Occupied(first) => {
                warn!(id = %key, kept = %first.get(), "Duplicate [packages] entry under a different case keeps the first");
            },
        }
    }

    let registry = config.registry();
    for (index, category) in config.priority.categories.iter().enumerate() {
        if category.trim().is_empty() {
            warn!(index, "Ignoring blank entry in priority.categories");
        } else if !registry.contains(category) {
            warn!(category = %category, "priority.categories names an unknown category");
        }

        if config.priority.categories[..index].contains(category) {
            warn!(category = %category, "Duplicate entry in priority.categories keeps its first position");
        }
    }

    for (key, entry) in &config.packages {
        if let Some(category) = non_blank(&entry.category) {
            if !registry.contains(category) {
                warn!(id = %key, category = %category, "Package assigned to an unknown category");
            }
        }
    }

    Ok(())
}

/// Load and parse loadout.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<LoadoutToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadoutError::io(format!("Failed to read {}", path), e))?;

    parse_settings(path.as_str(), &content).map_err(|e| match e {
        LoadoutError::ConfigValidation { field, reason } => LoadoutError::ConfigValidation {
            field,
            reason: format!("{} (in {})", reason, path),
        },
        other => other,
    })
}

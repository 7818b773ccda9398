//! Package catalog files
//!
//! A catalog is either a TOML document of `[[package]]` tables or a JSON
//! array of package objects. Keys are snake_case; the camelCase spellings
//! used by mod metadata (`loadAfter`, `loadBefore`, `incompatibleWith`) are
//! accepted too.

use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use loadout_core::error::LoadoutError;
use loadout_core::types::{Catalog, Package};

use crate::{parse_toml, ConfigResult};

/// On-disk catalog format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Utf8Path) -> ConfigResult<Self> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => Ok(CatalogFormat::Toml),
            Some("json") => Ok(CatalogFormat::Json),
            other => Err(LoadoutError::UnsupportedFormat {
                extension: other.unwrap_or("").to_string(),
            }),
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogFormat::Toml => f.write_str("toml"),
            CatalogFormat::Json => f.write_str("json"),
        }
    }
}

/// TOML catalog document
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default, rename = "package")]
    packages: Vec<Package>,
}

/// Parse a TOML catalog
pub fn parse_catalog_toml(file: &str, content: &str) -> ConfigResult<Catalog> {
    let document: CatalogDocument = parse_toml(file, content)?;
    build_catalog(document.packages)
}

/// Parse a JSON catalog
pub fn parse_catalog_json(file: &str, content: &str) -> ConfigResult<Catalog> {
    let packages: Vec<Package> = serde_json::from_str(content).map_err(|e| LoadoutError::JsonParse {
        file: file.to_string(),
        message: e.to_string(),
    })?;
    build_catalog(packages)
}

/// Parse catalog content in the given format
pub fn parse_catalog(file: &str, content: &str, format: CatalogFormat) -> ConfigResult<Catalog> {
    match format {
        CatalogFormat::Toml => parse_catalog_toml(file, content),
        CatalogFormat::Json => parse_catalog_json(file, content),
    }
}

/// Reject packages without an id, then build the catalog
///
/// Duplicate ids are dropped by the catalog itself with a warning.
fn build_catalog(packages: Vec<Package>) -> ConfigResult<Catalog> {
    if let Some(index) = packages.iter().position(|package| !package.is_valid()) {
        return Err(LoadoutError::invalid(
            format!("package[{}].id", index),
            "package id must not be empty",
        ));
    }

    let catalog = Catalog::from_packages(packages);
    debug!(packages = catalog.len(), "Parsed catalog");
    Ok(catalog)
}

/// Serialize a catalog in the given format
pub fn serialize_catalog(catalog: &Catalog, format: CatalogFormat) -> ConfigResult<String> {
    let packages: Vec<Package> = catalog.iter().cloned().collect();
    match format {
        CatalogFormat::Toml => toml::to_string_pretty(&CatalogDocument { packages })
            .map_err(|e| LoadoutError::invalid("catalog", format!("TOML serialization error: {}", e))),
        CatalogFormat::Json => serde_json::to_string_pretty(&packages).map_err(|e| LoadoutError::JsonParse {
            file: "catalog".to_string(),
            message: format!("JSON serialization error: {}", e),
        }),
    }
}

/// Load a catalog file, choosing the format by extension
pub async fn load_catalog(path: &Utf8Path) -> ConfigResult<Catalog> {
    let format = CatalogFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadoutError::io(format!("Failed to read {}", path), e))?;

    debug!(path = %path, format = %format, "Loading catalog");
    parse_catalog(path.as_str(), &content, format)
}

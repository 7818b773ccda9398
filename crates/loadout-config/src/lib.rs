//! Configuration parsing for loadout
//!
//! This crate handles `loadout.toml` settings and package catalog files
//! (TOML or JSON), and layers global, project, environment and command-line
//! settings into one view.

pub mod catalog;
pub mod merge;
pub mod settings;

// Re-export main types
pub use catalog::{load_catalog, CatalogFormat};
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource, LoadedConfig};
pub use settings::{
    CatalogSection, CategoriesSection, LoadoutToml, PackageOverride, PrioritySection, ResolveSection,
};

use loadout_core::error::LoadoutError;
use serde::de::DeserializeOwned;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, LoadoutError>;

/// Parse a TOML document into `T`
///
/// Syntax is checked with toml_edit first so errors carry a location; the
/// typed pass then runs through serde.
pub(crate) fn parse_toml<T: DeserializeOwned>(file: &str, content: &str) -> ConfigResult<T> {
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| toml_error(file, content, e.message(), e.span()))?;

    toml::from_str(content).map_err(|e| toml_error(file, content, e.message(), e.span()))
}

fn toml_error(
    file: &str,
    content: &str,
    message: &str,
    span: Option<std::ops::Range<usize>>,
) -> LoadoutError {
    let (line, column) = span
        .map(|span| line_column(content, span.start))
        .unwrap_or((0, 0));

    LoadoutError::TomlParse {
        file: file.to_string(),
        message: message.trim().to_string(),
        line,
        column,
    }
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

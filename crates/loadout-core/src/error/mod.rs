//! Error types and result aliases for loadout operations.
//!
//! Resolution itself never fails: cycles and unknown ids are reported as
//! data. These errors cover the I/O boundary (settings and catalog files)
//! and callers that explicitly ask for strict behavior.

use thiserror::Error;

/// Unified error type for all loadout operations
#[derive(Error, Debug)]
pub enum LoadoutError {
    // Config errors
    #[error("Failed to parse {file}: {message} at line {line}, column {column}")]
    TomlParse {
        file: String,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to parse {file}: {message}")]
    JsonParse { file: String, message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Catalog errors
    #[error("Unsupported catalog format '{extension}'")]
    UnsupportedFormat { extension: String },

    // Resolution errors
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for loadout operations
pub type LoadoutResult<T> = Result<T, LoadoutError>;

impl LoadoutError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a validation error for a configuration field
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LoadoutError::TomlParse { .. } | LoadoutError::JsonParse { .. } => {
                Some("Fix the syntax error at the reported location and try again")
            },
            LoadoutError::UnsupportedFormat { .. } => {
                Some("Catalog files must end in .toml or .json")
            },
            LoadoutError::CircularDependency { .. } => Some(
                "Remove one of the conflicting requires/loadAfter/loadBefore entries, or run without --strict",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_messages() {
        let err = LoadoutError::TomlParse {
            file: "loadout.toml".to_string(),
            message: "expected `=`".to_string(),
            line: 3,
            column: 7,
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse loadout.toml: expected `=` at line 3, column 7"
        );

        let err = LoadoutError::invalid("priority.categories", "must be a list");
        assert!(err.to_string().contains("priority.categories"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = LoadoutError::io("Failed to read mods.toml", source);
        assert!(err.source().is_some());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_suggestions() {
        let cycle = LoadoutError::CircularDependency {
            cycle: "a -> b -> a".to_string(),
        };
        assert!(cycle.suggestion().is_some());

        let invalid = LoadoutError::invalid("catalog", "empty id");
        assert!(invalid.suggestion().is_none());
    }
}

//! Terminal output formatting and utilities.
//!
//! Human-readable status lines go through `OutputHandler`; `--json` output
//! is written to stdout on its own so it can be piped.

pub mod colors;
pub mod errors;

use loadout_core::error::{LoadoutError, LoadoutResult};
use serde::Serialize;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Create an output handler that never emits color codes
    pub fn plain() -> Self {
        Self {
            colors: colors::ColorSupport::disabled(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a line without decoration
    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }

    /// Print a step message with emoji
    pub fn step(&self, emoji: &str, message: &str) {
        println!("{} {}", emoji, message);
    }

    /// Print a heading
    pub fn heading(&self, message: &str) {
        println!("{}", self.colors.cyan(message));
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> LoadoutResult<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| LoadoutError::invalid("output", format!("JSON serialization error: {}", e)))?;
        println!("{}", text);
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

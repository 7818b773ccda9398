//! # loadout-core
//!
//! Core types and utilities shared across all loadout crates.
//!
//! This crate provides:
//! - `PackageId`, a case-insensitive package identifier
//! - `Package` and `Catalog`, the read-only input of a resolution call
//! - `CategoryPriority` and `CategoryRegistry` for category-driven ordering
//! - `LoadoutError` enum for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageId, Package, Catalog, categories)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{LoadoutError, LoadoutResult};
pub use types::{
    Catalog, CategoryPriority, CategoryRegistry, Package, PackageId, DEFAULT_CATEGORIES,
    UNLISTED_RANK,
};

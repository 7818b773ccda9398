//! Core data types for load-order resolution.
//!
//! This module provides the fundamental types used throughout loadout:
//! - Package identifiers with case-insensitive identity
//! - Package records and the catalog that holds them
//! - Category priority lists and the category registry

pub mod catalog;
pub mod category;
pub mod id;
pub mod package;

// Re-export all public types
pub use catalog::Catalog;
pub use category::{CategoryPriority, CategoryRegistry, DEFAULT_CATEGORIES, UNLISTED_RANK};
pub use id::PackageId;
pub use package::Package;

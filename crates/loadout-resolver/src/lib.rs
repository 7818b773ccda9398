//! Load-order resolution engine for loadout
//!
//! This crate turns a catalog of packages and their declared ordering
//! relations into a single load order. It builds a constraint graph, runs a
//! deterministic Kahn topological sort, reports cycles instead of failing,
//! and nudges unconstrained neighbours into category-priority order.
//!
//! Everything here is pure and synchronous: each call builds its own graph
//! and drops it on return.

pub mod conflicts;
pub mod cycles;
pub mod graph;
pub mod priority;
pub mod resolver;
pub mod sort;

// Re-export main types
pub use conflicts::{find_incompatibilities, Incompatibility};
pub use cycles::{cycle_groups, detect_cycle_members, format_cycle, CycleGroup};
pub use graph::{ConstraintGraph, EdgeOrigin, OrderViolation};
pub use priority::{can_swap, stabilize, StabilizeStats};
pub use resolver::{resolve, Resolution, Resolver};
pub use sort::{topological_sort, TopoOrder};

use loadout_core::error::LoadoutError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, LoadoutError>;

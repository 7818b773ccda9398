//! loadout benchmarking suite
//!
//! Benchmarks for load-order resolution and catalog parsing on synthetic
//! catalogs of increasing size.

pub mod common;

pub use common::*;

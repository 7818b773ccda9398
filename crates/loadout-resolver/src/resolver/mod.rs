//! Public resolution API
//!
//! Builds the constraint graph, runs the deterministic sort and, when the
//! sort placed every package, the category-priority pass.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use loadout_core::error::LoadoutError;
use loadout_core::types::{Catalog, CategoryPriority, PackageId};

use crate::cycles::{cycle_groups, format_cycle};
use crate::graph::ConstraintGraph;
use crate::priority::stabilize;
use crate::sort::topological_sort;
use crate::ResolverResult;

/// Result of one resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Every distinct catalog id exactly once
    pub order: Vec<PackageId>,
    /// Whether a cycle forced a best-effort order
    pub had_cycle: bool,
    /// Ids left out of the acyclic prefix, in catalog order
    pub unresolved: Vec<PackageId>,
    /// Number of distinct constraints in the graph
    pub edge_count: usize,
    /// Swaps made by the priority pass
    pub swaps: usize,
}

impl Resolution {
    /// Get number of packages in the order
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the order is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Resolve a catalog into a load order
///
/// Never fails: cycles are reported through `had_cycle` and `unresolved`,
/// and the priority pass is skipped for them.
#[instrument(skip_all, fields(packages = catalog.len()))]
pub fn resolve(catalog: &Catalog, priority: Option<&CategoryPriority>) -> Resolution {
    let start_time = Instant::now();

    let graph = ConstraintGraph::build(catalog);
    let topo = topological_sort(&graph);
    let had_cycle = !topo.is_complete();
    let order = topo.ids(&graph);

    let unresolved: Vec<PackageId> = topo
        .unresolved()
        .iter()
        .map(|node| graph.id(*node).clone())
        .collect();

    let (order, swaps) = match priority {
        Some(priority) if !had_cycle && !priority.is_empty() => {
            let (order, stats) = stabilize(catalog, &order, priority);
            debug!(passes = stats.passes, swaps = stats.swaps, "Applied category priority");
            (order, stats.swaps)
        },
        _ => (order, 0),
    };

    if had_cycle {
        warn!(
            unresolved = %format_ids(&unresolved),
            "Load order contains a cycle, returning best-effort order"
        );
    }

    debug!(
        edges = graph.edge_count(),
        elapsed_us = start_time.elapsed().as_micros() as u64,
        "Resolved load order"
    );

    Resolution {
        order,
        had_cycle,
        unresolved,
        edge_count: graph.edge_count(),
        swaps,
    }
}

fn format_ids(ids: &[PackageId]) -> String {
    ids.iter()
        .map(PackageId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolver holding a category priority across calls
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    priority: CategoryPriority,
}

impl Resolver {
    /// Create a resolver with a category priority
    pub fn with_priority(priority: CategoryPriority) -> Self {
        Self { priority }
    }

    /// Resolve a catalog, returning a best-effort order on cycles
    pub fn resolve(&self, catalog: &Catalog) -> Resolution {
        resolve(catalog, Some(&self.priority))
    }

    /// Resolve a catalog, failing when it contains a cycle
    pub fn resolve_strict(&self, catalog: &Catalog) -> ResolverResult<Resolution> {
        let resolution = self.resolve(catalog);
        if !resolution.had_cycle {
            return Ok(resolution);
        }

        let graph = ConstraintGraph::build(catalog);
        let groups = cycle_groups(&graph);
        let cycle = if groups.is_empty() {
            format_cycle(&resolution.unresolved)
        } else {
            groups
                .iter()
                .map(|group| group.describe())
                .collect::<Vec<_>>()
                .join("; ")
        };

        Err(LoadoutError::CircularDependency { cycle })
    }
}

#[cfg(test)]
mod tests;

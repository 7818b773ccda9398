//! Deterministic topological sort (Kahn's algorithm)
//!
//! Ties between simultaneously eligible nodes are broken by catalog order for
//! the initial queue and by successor discovery order afterwards, so the same
//! catalog always yields the same order.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use tracing::warn;

use loadout_core::types::PackageId;

use crate::graph::ConstraintGraph;

/// Output of the topological sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoOrder {
    /// Every node exactly once: the acyclic prefix, then unplaced nodes
    order: Vec<NodeIndex>,
    /// Length of the acyclic prefix
    placed: usize,
}

impl TopoOrder {
    /// Full order, including unplaced nodes appended in catalog order
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Whether every node was placed (no cycle)
    pub fn is_complete(&self) -> bool {
        self.placed == self.order.len()
    }

    /// Nodes Kahn's algorithm could place
    pub fn placed(&self) -> &[NodeIndex] {
        &self.order[..self.placed]
    }

    /// Nodes left out of the acyclic prefix, in catalog order
    pub fn unresolved(&self) -> &[NodeIndex] {
        &self.order[self.placed..]
    }

    /// Resolve node indices to package ids
    pub fn ids(&self, graph: &ConstraintGraph<'_>) -> Vec<PackageId> {
        self.order.iter().map(|node| graph.id(*node).clone()).collect()
    }
}

/// Result of repeatedly stripping zero in-degree nodes
pub(crate) struct Strip {
    /// Nodes in the order they were removed
    pub placed: Vec<NodeIndex>,
    /// In-degree left on each node once no more can be removed
    pub remaining: Vec<usize>,
}

/// Run Kahn's algorithm without touching the graph
pub(crate) fn strip(graph: &ConstraintGraph<'_>) -> Strip {
    let mut remaining = graph.in_degrees().to_vec();
    let mut placed = Vec::with_capacity(graph.node_count());

    let mut queue: VecDeque<NodeIndex> = graph
        .nodes()
        .filter(|node| remaining[node.index()] == 0)
        .collect();

    while let Some(current) = queue.pop_front() {
        placed.push(current);

        for &next in graph.successors(current) {
            let degree = &mut remaining[next.index()];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(next);
            }
        }
    }

    Strip { placed, remaining }
}

/// Topologically sort the graph
///
/// On cyclic input the nodes that could not be placed are appended in
/// catalog order, so the result always holds every node.
pub fn topological_sort(graph: &ConstraintGraph<'_>) -> TopoOrder {
    let Strip { mut placed, remaining } = strip(graph);
    let placed_len = placed.len();

    if placed_len < graph.node_count() {
        warn!(
            unresolved = graph.node_count() - placed_len,
            "Circular load order detected, appending unresolved packages in catalog order"
        );
        placed.extend(graph.nodes().filter(|node| remaining[node.index()] > 0));
    }

    TopoOrder {
        order: placed,
        placed: placed_len,
    }
}

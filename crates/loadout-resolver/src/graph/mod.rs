//! Constraint graph built from a package catalog
//!
//! An edge `A -> B` means "A must load before B". Node indices match catalog
//! positions, so index order is catalog insertion order.
//!
//! Successor lists are kept in edge-discovery order next to the petgraph
//! graph. petgraph iterates neighbours most-recent-first, and the sort needs
//! the opposite to stay reproducible.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use loadout_core::types::{Catalog, Package, PackageId};

/// Which declaration produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrigin {
    /// The later package lists the earlier one in `requires`
    Requires,
    /// The later package lists the earlier one in `load_after`
    LoadAfter,
    /// The earlier package lists the later one in `load_before`
    LoadBefore,
}

impl fmt::Display for EdgeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeOrigin::Requires => "requires",
            EdgeOrigin::LoadAfter => "loadAfter",
            EdgeOrigin::LoadBefore => "loadBefore",
        };
        f.write_str(name)
    }
}

/// An edge that a given order does not respect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderViolation {
    /// Package that must come first
    pub predecessor: PackageId,
    /// Package that must come after it
    pub successor: PackageId,
    /// Declaration behind the edge
    pub origin: EdgeOrigin,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must load before {} ({})",
            self.predecessor, self.successor, self.origin
        )
    }
}

/// Directed precedence graph over one catalog snapshot
#[derive(Debug)]
pub struct ConstraintGraph<'a> {
    /// Catalog the graph was built from
    catalog: &'a Catalog,
    /// Underlying directed graph
    graph: DiGraph<&'a PackageId, EdgeOrigin>,
    /// Direct successors per node, in discovery order
    successors: Vec<Vec<NodeIndex>>,
    /// Number of distinct predecessors per node
    in_degree: Vec<usize>,
}

impl<'a> ConstraintGraph<'a> {
    /// Build the graph for a catalog
    ///
    /// Unknown ids and self references are skipped; repeated edges between
    /// the same ordered pair are added once.
    pub fn build(catalog: &'a Catalog) -> Self {
        let node_count = catalog.len();
        let mut graph = DiGraph::with_capacity(node_count, node_count);
        for id in catalog.ids() {
            graph.add_node(id);
        }

        let mut this = Self {
            catalog,
            graph,
            successors: vec![Vec::new(); node_count],
            in_degree: vec![0; node_count],
        };

        for (index, package) in catalog.iter().enumerate() {
            let node = NodeIndex::new(index);

            for dep in &package.requires {
                if let Some(dep) = this.index_of(dep) {
                    this.add_constraint(dep, node, EdgeOrigin::Requires);
                }
            }

            for after in &package.load_after {
                if let Some(after) = this.index_of(after) {
                    this.add_constraint(after, node, EdgeOrigin::LoadAfter);
                }
            }

            for before in &package.load_before {
                if let Some(before) = this.index_of(before) {
                    this.add_constraint(node, before, EdgeOrigin::LoadBefore);
                }
            }
        }

        debug!(
            packages = this.node_count(),
            constraints = this.edge_count(),
            "Built constraint graph"
        );

        this
    }

    /// Add `from -> to` unless it is a self loop or already present
    fn add_constraint(&mut self, from: NodeIndex, to: NodeIndex, origin: EdgeOrigin) -> bool {
        if from == to || self.graph.find_edge(from, to).is_some() {
            return false;
        }

        self.graph.add_edge(from, to, origin);
        self.successors[from.index()].push(to);
        self.in_degree[to.index()] += 1;
        true
    }

    /// Catalog the graph was built from
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Node for a package id
    pub fn index_of(&self, id: &PackageId) -> Option<NodeIndex> {
        self.catalog.position(id).map(NodeIndex::new)
    }

    /// Package id of a node
    pub fn id(&self, node: NodeIndex) -> &'a PackageId {
        self.graph[node]
    }

    /// Package record of a node
    pub fn package(&self, node: NodeIndex) -> Option<&'a Package> {
        self.catalog.get_index(node.index())
    }

    /// All nodes in catalog order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Direct successors of a node, in discovery order
    pub fn successors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.successors[node.index()]
    }

    /// In-degree table indexed by node
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Every edge with its origin, in discovery order
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeOrigin)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), *edge.weight()))
    }

    /// Underlying petgraph graph
    pub fn as_petgraph(&self) -> &DiGraph<&'a PackageId, EdgeOrigin> {
        &self.graph
    }

    /// Get number of packages in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of distinct constraints in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check an order against every constraint
    ///
    /// Ids the catalog does not know are ignored, as are catalog packages
    /// missing from `order`. A repeated id counts at its first position.
    pub fn violations(&self, order: &[PackageId]) -> Vec<OrderViolation> {
        let mut position: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        for (pos, id) in order.iter().enumerate() {
            if let Some(node) = self.index_of(id) {
                position.entry(node).or_insert(pos);
            }
        }

        self.edges()
            .filter(|(from, to, _)| match (position.get(from), position.get(to)) {
                (Some(from_pos), Some(to_pos)) => from_pos > to_pos,
                _ => false,
            })
            .map(|(from, to, origin)| OrderViolation {
                predecessor: self.id(from).clone(),
                successor: self.id(to).clone(),
                origin,
            })
            .collect()
    }
}

//! Cycle diagnostics
//!
//! Two views of the same problem:
//! - cycle members: every node Kahn's algorithm cannot place. This includes
//!   packages that only wait on a cycle without being part of one.
//! - cycle groups: strongly connected components, i.e. the cycles themselves,
//!   each with one concrete path for display.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use loadout_core::types::{Catalog, PackageId};

use crate::graph::ConstraintGraph;
use crate::sort::strip;

/// One strongly connected set of packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleGroup {
    /// Members in catalog order
    pub members: Vec<PackageId>,
    /// A closed path through the first member, e.g. `[a, b, a]`
    pub path: Vec<PackageId>,
}

impl CycleGroup {
    /// Render the path as `a -> b -> a`
    pub fn describe(&self) -> String {
        format_cycle(&self.path)
    }
}

/// Ids of every package that cannot be placed in a topological order
///
/// Iteration order of the returned set is catalog order. Empty for an
/// acyclic catalog.
pub fn detect_cycle_members(catalog: &Catalog) -> IndexSet<PackageId> {
    let graph = ConstraintGraph::build(catalog);
    cycle_members(&graph)
        .into_iter()
        .map(|node| graph.id(node).clone())
        .collect()
}

/// Nodes left with a positive in-degree after stripping, in catalog order
pub fn cycle_members(graph: &ConstraintGraph<'_>) -> Vec<NodeIndex> {
    let remaining = strip(graph).remaining;
    graph
        .nodes()
        .filter(|node| remaining[node.index()] > 0)
        .collect()
}

/// Strongly connected components with more than one member
///
/// Groups are ordered by the catalog position of their first member.
pub fn cycle_groups(graph: &ConstraintGraph<'_>) -> Vec<CycleGroup> {
    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(graph.as_petgraph())
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    components.sort_unstable_by_key(|component| component[0]);

    components
        .into_iter()
        .map(|component| {
            let path = closed_path(graph, &component);
            CycleGroup {
                members: component.iter().map(|node| graph.id(*node).clone()).collect(),
                path: path.into_iter().map(|node| graph.id(node).clone()).collect(),
            }
        })
        .collect()
}

/// Shortest closed walk from the first member back to itself, inside the
/// component
fn closed_path(graph: &ConstraintGraph<'_>, component: &[NodeIndex]) -> Vec<NodeIndex> {
    let start = component[0];
    let members: HashSet<NodeIndex> = component.iter().copied().collect();

    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for &next in graph.successors(current) {
            if !members.contains(&next) {
                continue;
            }

            if next == start {
                let mut path = vec![start];
                let mut cursor = current;
                while cursor != start {
                    path.push(cursor);
                    cursor = parent[&cursor];
                }
                path.push(start);
                path.reverse();
                return path;
            }

            if visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    // Unreachable for a real strongly connected component
    component.to_vec()
}

/// Format cycle as "a -> b -> a"
pub fn format_cycle(cycle: &[PackageId]) -> String {
    if cycle.is_empty() {
        return "No cycle".to_string();
    }

    cycle
        .iter()
        .map(PackageId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_core::types::Package;

    fn names(set: &IndexSet<PackageId>) -> Vec<&str> {
        set.iter().map(PackageId::as_str).collect()
    }

    #[test]
    fn test_acyclic_has_no_members() {
        let catalog = Catalog::from_packages([
            Package::new("A"),
            Package::new("B").requires("A"),
            Package::new("C").load_before("A"),
        ]);
        assert!(detect_cycle_members(&catalog).is_empty());

        let graph = ConstraintGraph::build(&catalog);
        assert!(cycle_groups(&graph).is_empty());
    }

    #[test]
    fn test_two_cycle() {
        let catalog = Catalog::from_packages([
            Package::new("A").requires("B"),
            Package::new("B").requires("A"),
        ]);
        let members = detect_cycle_members(&catalog);
        assert_eq!(names(&members), vec!["A", "B"]);
        assert!(members.contains(&PackageId::new("a")));
    }

    #[test]
    fn test_members_include_blocked_dependents() {
        let catalog = Catalog::from_packages([
            Package::new("ok"),
            Package::new("x").load_after("y"),
            Package::new("y").load_after("x"),
            Package::new("downstream").requires("x"),
        ]);
        let members = detect_cycle_members(&catalog);
        assert_eq!(names(&members), vec!["x", "y", "downstream"]);

        let graph = ConstraintGraph::build(&catalog);
        let groups = cycle_groups(&graph);
        assert_eq!(groups.len(), 1);
        let group: Vec<&str> = groups[0].members.iter().map(PackageId::as_str).collect();
        assert_eq!(group, vec!["x", "y"]);
    }

    #[test]
    fn test_cycle_path() {
        let catalog = Catalog::from_packages([
            Package::new("a").load_before("b"),
            Package::new("b").load_before("c"),
            Package::new("c").load_before("a"),
        ]);
        let graph = ConstraintGraph::build(&catalog);
        let groups = cycle_groups(&graph);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].describe(), "a -> b -> c -> a");
    }

    #[test]
    fn test_separate_groups_in_catalog_order() {
        let catalog = Catalog::from_packages([
            Package::new("p").requires("q"),
            Package::new("a").requires("b"),
            Package::new("q").requires("p"),
            Package::new("b").requires("a"),
        ]);
        let graph = ConstraintGraph::build(&catalog);
        let groups = cycle_groups(&graph);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members[0].as_str(), "p");
        assert_eq!(groups[1].members[0].as_str(), "a");
        assert_eq!(groups[0].path.first(), groups[0].path.last());
    }

    #[test]
    fn test_format_cycle() {
        assert_eq!(format_cycle(&[]), "No cycle");
        let path: Vec<PackageId> = vec!["A".into(), "B".into(), "A".into()];
        assert_eq!(format_cycle(&path), "A -> B -> A");
    }
}

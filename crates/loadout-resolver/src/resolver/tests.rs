use super::*;
use loadout_core::types::Package;

fn names(resolution: &Resolution) -> Vec<&str> {
    resolution.order.iter().map(PackageId::as_str).collect()
}

fn priority(list: &[&str]) -> CategoryPriority {
    CategoryPriority::new(list.iter().copied())
}

#[test]
fn test_empty_catalog() {
    let resolution = resolve(&Catalog::new(), None);
    assert!(resolution.is_empty());
    assert!(!resolution.had_cycle);
    assert!(resolution.unresolved.is_empty());
}

#[test]
fn test_requires_and_load_before() {
    let catalog = Catalog::from_packages([
        Package::new("A"),
        Package::new("B").requires("A"),
        Package::new("C").load_before("A"),
    ]);
    let resolution = resolve(&catalog, None);

    assert_eq!(names(&resolution), vec!["C", "A", "B"]);
    assert!(!resolution.had_cycle);
    assert_eq!(resolution.edge_count, 2);
}

#[test]
fn test_two_cycle_is_reported() {
    let catalog = Catalog::from_packages([
        Package::new("A").requires("B"),
        Package::new("B").requires("A"),
    ]);
    let resolution = resolve(&catalog, None);

    assert!(resolution.had_cycle);
    assert_eq!(names(&resolution), vec!["A", "B"]);
    assert_eq!(resolution.unresolved, vec![PackageId::new("A"), PackageId::new("B")]);

    let members = detect_members(&catalog);
    assert_eq!(members, vec!["A", "B"]);
}

fn detect_members(catalog: &Catalog) -> Vec<String> {
    crate::detect_cycle_members(catalog)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_priority_orders_unrelated_packages() {
    let catalog = Catalog::from_packages([
        Package::new("A").with_category("core"),
        Package::new("B").with_category("content"),
    ]);
    let resolution = resolve(&catalog, Some(&priority(&["content", "core"])));

    assert_eq!(names(&resolution), vec!["B", "A"]);
    assert_eq!(resolution.swaps, 1);
}

#[test]
fn test_priority_never_breaks_dependency() {
    let catalog = Catalog::from_packages([
        Package::new("A").requires("B").with_category("content"),
        Package::new("B").with_category("core"),
    ]);
    let resolution = resolve(&catalog, Some(&priority(&["content", "core"])));

    assert_eq!(names(&resolution), vec!["B", "A"]);
    assert_eq!(resolution.swaps, 0);
}

#[test]
fn test_cycle_skips_priority_pass() {
    let catalog = Catalog::from_packages([
        Package::new("A").with_category("core"),
        Package::new("B").with_category("content"),
        Package::new("X").requires("Y"),
        Package::new("Y").requires("X"),
    ]);
    let resolution = resolve(&catalog, Some(&priority(&["content", "core"])));

    assert!(resolution.had_cycle);
    assert_eq!(names(&resolution), vec!["A", "B", "X", "Y"]);
    assert_eq!(resolution.swaps, 0);
}

#[test]
fn test_empty_priority_makes_no_swaps() {
    let catalog = Catalog::from_packages([
        Package::new("A").with_category("core"),
        Package::new("B").with_category("content"),
    ]);
    let resolution = resolve(&catalog, Some(&CategoryPriority::default()));
    assert_eq!(names(&resolution), vec!["A", "B"]);
}

#[test]
fn test_case_insensitive_ids() {
    let catalog = Catalog::from_packages([
        Package::new("Content.Mod").requires("CORE.MOD"),
        Package::new("Core.Mod"),
        Package::new("core.mod").with_category("dropped"),
    ]);
    let resolution = resolve(&catalog, None);

    assert_eq!(names(&resolution), vec!["Core.Mod", "Content.Mod"]);
    assert_eq!(resolution.order[1], PackageId::new("content.mod"));
}

#[test]
fn test_unknown_references_are_ignored() {
    let catalog = Catalog::from_packages([
        Package::new("A").requires("Not.Installed").load_before("Also.Missing"),
        Package::new("B").load_after("Ghost"),
    ]);
    let resolution = resolve(&catalog, None);

    assert_eq!(names(&resolution), vec!["A", "B"]);
    assert_eq!(resolution.edge_count, 0);
}

#[test]
fn test_resolver_uses_its_priority() {
    let catalog = Catalog::from_packages([
        Package::new("patch").with_category("translation"),
        Package::new("game").with_category("core"),
    ]);

    let unprioritized = Resolver::default();
    assert_eq!(names(&unprioritized.resolve(&catalog)), vec!["patch", "game"]);

    let resolver = Resolver::with_priority(priority(&["core", "translation"]));
    assert_eq!(names(&resolver.resolve(&catalog)), vec!["game", "patch"]);
}

#[test]
fn test_resolve_strict() {
    let resolver = Resolver::with_priority(priority(&["core"]));

    let acyclic = Catalog::from_packages([Package::new("a"), Package::new("b").requires("a")]);
    let resolution = resolver.resolve_strict(&acyclic).unwrap();
    assert_eq!(names(&resolution), vec!["a", "b"]);

    let cyclic = Catalog::from_packages([
        Package::new("a").load_after("b"),
        Package::new("b").load_after("a"),
        Package::new("c").requires("a"),
    ]);
    let err = resolver.resolve_strict(&cyclic).unwrap_err();
    match err {
        LoadoutError::CircularDependency { cycle } => assert_eq!(cycle, "a -> b -> a"),
        other => panic!("unexpected error: {other}"),
    }

    let members: Vec<String> = crate::detect_cycle_members(&cyclic)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(members, vec!["a", "b", "c"]);
}

#[test]
fn test_resolution_serializes() {
    let catalog = Catalog::from_packages([Package::new("A"), Package::new("B").requires("A")]);
    let json = serde_json::to_value(resolve(&catalog, None)).unwrap();

    assert_eq!(json["order"], serde_json::json!(["A", "B"]));
    assert_eq!(json["had_cycle"], serde_json::json!(false));
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    const CATEGORIES: [&str; 4] = ["core", "framework", "content", ""];

    /// Relation kinds: 0 = requires, 1 = load_after, 2 = load_before.
    /// Each relation `(from, to, kind)` asks for an edge `from -> to`.
    fn build_catalog(count: usize, categories: &[usize], relations: &[(usize, usize, u8)]) -> Catalog {
        let mut packages: Vec<Package> = (0..count)
            .map(|i| {
                let category = CATEGORIES[categories.get(i).copied().unwrap_or(0) % CATEGORIES.len()];
                Package::new(format!("pkg{i}")).with_category(category)
            })
            .collect();

        for &(from, to, kind) in relations {
            if from >= count || to >= count || from == to {
                continue;
            }
            match kind % 3 {
                0 => packages[to].requires.push(PackageId::new(format!("PKG{from}"))),
                1 => packages[to].load_after.push(PackageId::new(format!("pkg{from}"))),
                _ => packages[from].load_before.push(PackageId::new(format!("Pkg{to}"))),
            }
        }

        Catalog::from_packages(packages)
    }

    /// Point every relation from the lower to the higher rank
    ///
    /// `ranks` is a permutation of the catalog positions, so the result is
    /// acyclic while edges still run against catalog order.
    fn ranked(relations: Vec<(usize, usize, u8)>, ranks: &[usize]) -> Vec<(usize, usize, u8)> {
        relations
            .into_iter()
            .filter(|&(a, b, _)| a < ranks.len() && b < ranks.len())
            .map(|(a, b, kind)| if ranks[a] <= ranks[b] { (a, b, kind) } else { (b, a, kind) })
            .collect()
    }

    fn rank_permutation() -> impl Strategy<Value = Vec<usize>> {
        Just((0..10).collect::<Vec<usize>>()).prop_shuffle()
    }

    #[test]
    fn test_ranked_relations_can_oppose_catalog_order() {
        let reversed: Vec<usize> = (0..10).rev().collect();
        let relations = ranked(vec![(0, 1, 0), (1, 2, 1), (2, 3, 2)], &reversed);
        assert_eq!(relations, vec![(1, 0, 0), (2, 1, 1), (3, 2, 2)]);

        let catalog = build_catalog(4, &[], &relations);
        let graph = ConstraintGraph::build(&catalog);
        let catalog_order: Vec<PackageId> = catalog.ids().cloned().collect();
        assert_eq!(graph.violations(&catalog_order).len(), 3);

        let resolution = resolve(&catalog, None);
        assert!(graph.violations(&resolution.order).is_empty());
        assert_eq!(names(&resolution), vec!["pkg3", "pkg2", "pkg1", "pkg0"]);
    }

    fn assert_respects_edges(catalog: &Catalog, order: &[PackageId]) -> Result<(), TestCaseError> {
        let graph = ConstraintGraph::build(catalog);
        let violations = graph.violations(order);
        prop_assert!(violations.is_empty(), "violated: {:?}", violations);
        Ok(())
    }

    fn test_priority() -> CategoryPriority {
        CategoryPriority::new(["content", "core", "framework"])
    }

    proptest! {
        #[test]
        fn resolution_is_total(
            count in 0usize..10,
            categories in prop::collection::vec(0usize..4, 10),
            relations in prop::collection::vec((0usize..10, 0usize..10, 0u8..3), 0..25)
        ) {
            let catalog = build_catalog(count, &categories, &relations);
            let resolution = resolve(&catalog, Some(&test_priority()));

            prop_assert_eq!(resolution.len(), catalog.len());
            let distinct: HashSet<&PackageId> = resolution.order.iter().collect();
            prop_assert_eq!(distinct.len(), catalog.len());
            for id in catalog.ids() {
                prop_assert!(distinct.contains(id));
            }
        }

        #[test]
        fn acyclic_constraints_are_satisfied(
            count in 1usize..10,
            categories in prop::collection::vec(0usize..4, 10),
            relations in prop::collection::vec((0usize..10, 0usize..10, 0u8..3), 0..25),
            ranks in rank_permutation()
        ) {
            let catalog = build_catalog(count, &categories, &ranked(relations, &ranks));

            let raw = resolve(&catalog, None);
            prop_assert!(!raw.had_cycle);
            prop_assert!(raw.unresolved.is_empty());
            assert_respects_edges(&catalog, &raw.order)?;

            let stabilized = resolve(&catalog, Some(&test_priority()));
            prop_assert!(!stabilized.had_cycle);
            assert_respects_edges(&catalog, &stabilized.order)?;
        }

        #[test]
        fn cycle_members_are_kahn_residue(
            count in 1usize..9,
            relations in prop::collection::vec((0usize..9, 0usize..9, 0u8..3), 0..20)
        ) {
            let catalog = build_catalog(count, &[], &relations);
            let members = crate::detect_cycle_members(&catalog);
            let resolution = resolve(&catalog, None);

            let unresolved: Vec<&PackageId> = resolution.unresolved.iter().collect();
            let member_list: Vec<&PackageId> = members.iter().collect();
            prop_assert_eq!(unresolved, member_list);
            prop_assert_eq!(resolution.had_cycle, !members.is_empty());

            // Every member waits on another member
            let graph = ConstraintGraph::build(&catalog);
            for member in &members {
                let waits = graph.edges().any(|(from, to, _)| {
                    graph.id(to) == member && members.contains(graph.id(from))
                });
                prop_assert!(waits, "{} has no predecessor among members", member);
            }

            // The placed prefix is a valid order of its own
            let placed = &resolution.order[..resolution.len() - members.len()];
            let position: HashMap<&PackageId, usize> =
                placed.iter().enumerate().map(|(pos, id)| (id, pos)).collect();
            for (from, to, _) in graph.edges() {
                if let Some(to_pos) = position.get(graph.id(to)) {
                    let from_pos = position.get(graph.id(from));
                    prop_assert!(matches!(from_pos, Some(pos) if pos < to_pos));
                }
            }
        }

        #[test]
        fn priority_pass_is_idempotent(
            count in 1usize..10,
            categories in prop::collection::vec(0usize..4, 10),
            relations in prop::collection::vec((0usize..10, 0usize..10, 0u8..3), 0..20),
            ranks in rank_permutation()
        ) {
            let catalog = build_catalog(count, &categories, &ranked(relations, &ranks));
            let once = resolve(&catalog, Some(&test_priority()));
            let (twice, stats) = stabilize(&catalog, &once.order, &test_priority());

            prop_assert_eq!(&once.order, &twice);
            prop_assert_eq!(stats.swaps, 0);
        }

        #[test]
        fn ids_are_case_insensitive(
            count in 1usize..8,
            relations in prop::collection::vec((0usize..8, 0usize..8, 0u8..3), 0..15)
        ) {
            let catalog = build_catalog(count, &[], &relations);
            let shouted: Catalog = catalog
                .iter()
                .map(|package| {
                    let mut package = package.clone();
                    for list in [&mut package.requires, &mut package.load_after, &mut package.load_before] {
                        for id in list.iter_mut() {
                            *id = PackageId::new(id.as_str().to_uppercase());
                        }
                    }
                    package
                })
                .collect();

            prop_assert_eq!(resolve(&catalog, None), resolve(&shouted, None));
        }
    }
}

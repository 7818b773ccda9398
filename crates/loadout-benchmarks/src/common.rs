//! Common utilities for benchmarks

use criterion::Criterion;
use loadout_core::types::{Catalog, CategoryPriority, Package, DEFAULT_CATEGORIES};
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

fn category(index: usize) -> &'static str {
    DEFAULT_CATEGORIES[index % DEFAULT_CATEGORIES.len()]
}

fn id(index: usize) -> String {
    format!("Author{}.Package{}", index % 17, index)
}

/// Every package requires the previous one
pub fn chain_catalog(count: usize) -> Catalog {
    (0..count)
        .map(|i| {
            let package = Package::new(id(i)).with_category(category(i));
            if i == 0 {
                package
            } else {
                package.requires(id(i - 1))
            }
        })
        .collect()
}

/// Layers of `width` packages, each depending on two packages of the
/// layer before, with a load-before hint across every other layer
pub fn layered_catalog(count: usize, width: usize) -> Catalog {
    let width = width.max(1);
    (0..count)
        .map(|i| {
            let mut package = Package::new(id(i)).with_category(category(i * 7));
            if i >= width {
                let layer_start = (i / width - 1) * width;
                package = package
                    .requires(id(layer_start + i % width))
                    .load_after(id(layer_start + (i + 1) % width));
            }
            if (i / width) % 2 == 0 && i + 2 * width < count {
                package = package.load_before(id(i + 2 * width));
            }
            package
        })
        .collect()
}

/// Unconstrained packages in reverse category order, so the priority pass
/// has the most work to do
pub fn wide_catalog(count: usize) -> Catalog {
    (0..count)
        .map(|i| Package::new(id(i)).with_category(category(count - i)))
        .collect()
}

/// A chain closed into a cycle at the end, with free packages in front
pub fn cyclic_catalog(count: usize) -> Catalog {
    let free = count / 2;
    (0..count)
        .map(|i| {
            let package = Package::new(id(i)).with_category(category(i));
            if i <= free {
                package
            } else if i == free + 1 {
                package.load_after(id(count - 1))
            } else {
                package.requires(id(i - 1))
            }
        })
        .collect()
}

/// Priority over the default categories
pub fn bench_priority() -> CategoryPriority {
    CategoryPriority::new(DEFAULT_CATEGORIES.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_resolver::resolve;

    #[test]
    fn test_generated_catalogs_have_requested_size() {
        assert_eq!(chain_catalog(50).len(), 50);
        assert_eq!(layered_catalog(50, 8).len(), 50);
        assert_eq!(wide_catalog(50).len(), 50);
        assert_eq!(cyclic_catalog(50).len(), 50);
    }

    #[test]
    fn test_generated_catalogs_resolve_as_expected() {
        assert!(!resolve(&chain_catalog(40), Some(&bench_priority())).had_cycle);
        assert!(!resolve(&layered_catalog(40, 5), Some(&bench_priority())).had_cycle);
        assert!(!resolve(&wide_catalog(40), Some(&bench_priority())).had_cycle);

        let cyclic = resolve(&cyclic_catalog(40), None);
        assert!(cyclic.had_cycle);
        assert_eq!(cyclic.unresolved.len(), 19);
    }
}

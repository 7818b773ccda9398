//! Load-order resolution benchmarks
//!
//! Covers graph construction, the topological sort, the category-priority
//! pass and cycle diagnostics on synthetic catalogs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadout_benchmarks::{
    bench_priority, chain_catalog, criterion_config, cyclic_catalog, layered_catalog, wide_catalog,
};
use loadout_resolver::{detect_cycle_members, resolve, topological_sort, ConstraintGraph};

const SIZES: [usize; 3] = [100, 500, 2000];

/// Full resolution with and without a category priority
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let priority = bench_priority();

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_catalog(size);
        group.bench_with_input(BenchmarkId::new("chain", size), &chain, |b, catalog| {
            b.iter(|| black_box(resolve(catalog, Some(&priority))));
        });

        let layered = layered_catalog(size, 16);
        group.bench_with_input(BenchmarkId::new("layered", size), &layered, |b, catalog| {
            b.iter(|| black_box(resolve(catalog, Some(&priority))));
        });

        group.bench_with_input(BenchmarkId::new("layered_no_priority", size), &layered, |b, catalog| {
            b.iter(|| black_box(resolve(catalog, None)));
        });
    }

    group.finish();
}

/// Worst case for the adjacent-swap pass
fn bench_priority_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_pass");
    group.sample_size(20);
    let priority = bench_priority();

    for size in [100, 500, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        let wide = wide_catalog(size);
        group.bench_with_input(BenchmarkId::new("wide", size), &wide, |b, catalog| {
            b.iter(|| black_box(resolve(catalog, Some(&priority))));
        });
    }

    group.finish();
}

/// Graph construction and sorting on their own
fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let catalog = layered_catalog(size, 16);

        group.bench_with_input(BenchmarkId::new("build", size), &catalog, |b, catalog| {
            b.iter(|| black_box(ConstraintGraph::build(catalog).edge_count()));
        });

        let graph = ConstraintGraph::build(&catalog);
        group.bench_with_input(BenchmarkId::new("topological_sort", size), &graph, |b, graph| {
            b.iter(|| black_box(topological_sort(graph)));
        });
    }

    group.finish();
}

/// Cycle diagnostics on a catalog where half the packages are stuck
fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let catalog = cyclic_catalog(size);

        group.bench_with_input(BenchmarkId::new("detect_members", size), &catalog, |b, catalog| {
            b.iter(|| black_box(detect_cycle_members(catalog)));
        });

        group.bench_with_input(BenchmarkId::new("resolve", size), &catalog, |b, catalog| {
            b.iter(|| black_box(resolve(catalog, None)));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_resolve, bench_priority_pass, bench_graph, bench_cycles
}
criterion_main!(benches);

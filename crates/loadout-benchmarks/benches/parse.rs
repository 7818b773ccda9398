//! Catalog and settings parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadout_benchmarks::{criterion_config, layered_catalog};
use loadout_config::catalog::{parse_catalog, serialize_catalog, CatalogFormat};
use loadout_config::settings::parse_loadout_toml;

/// Parse the same catalog from TOML and JSON
fn bench_catalog_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_parsing");
    group.measurement_time(std::time::Duration::from_secs(5));

    for size in [100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        let catalog = layered_catalog(size, 16);

        for format in [CatalogFormat::Toml, CatalogFormat::Json] {
            let Ok(content) = serialize_catalog(&catalog, format) else {
                continue;
            };
            group.bench_with_input(BenchmarkId::new(format.to_string(), size), &content, |b, content| {
                b.iter(|| black_box(parse_catalog("bench", content, format)));
            });
        }
    }

    group.finish();
}

/// Parse a typical loadout.toml
fn bench_settings_parsing(c: &mut Criterion) {
    let content = r#"
[priority]
categories = ["core", "dlc", "framework", "logic", "feature", "race", "translation"]

[categories]
custom = ["qol", "patch"]

[catalog]
path = "mods.toml"

[resolve]
strict = false
"#;

    c.bench_function("settings_parsing", |b| {
        b.iter(|| black_box(parse_loadout_toml(content)));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_catalog_parsing, bench_settings_parsing
}
criterion_main!(benches);

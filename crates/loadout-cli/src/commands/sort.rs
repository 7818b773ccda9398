//! `loadout sort` command implementation.
//!
//! Resolves the configured catalog and prints the load order, one id per
//! line, or the full resolution as JSON.

use std::time::Instant;

use serde::Serialize;

use loadout_core::error::LoadoutResult;
use loadout_core::types::Catalog;
use loadout_resolver::{Resolution, Resolver};

use super::{cli_overrides, load_config, load_configured_catalog, CommandContext};
use crate::CatalogArgs;

/// JSON output of `loadout sort`
#[derive(Debug, Serialize)]
pub struct SortReport<'a> {
    /// Fingerprint of the catalog snapshot that was resolved
    pub fingerprint: String,
    #[serde(flatten)]
    pub resolution: &'a Resolution,
}

/// Execute the `loadout sort` command
pub async fn execute(
    source: CatalogArgs,
    priority: Option<Vec<String>>,
    strict: bool,
    ctx: &CommandContext,
) -> LoadoutResult<()> {
    let start_time = Instant::now();

    let overrides = cli_overrides(source.catalog.as_deref(), priority.as_deref(), strict);
    let config = load_config(ctx, overrides).await?;
    let (catalog, path) = load_configured_catalog(ctx, &config).await?;

    let resolver = Resolver::with_priority(config.settings.category_priority());
    let resolution = if config.settings.is_strict() {
        resolver.resolve_strict(&catalog)?
    } else {
        resolver.resolve(&catalog)
    };

    if source.json {
        return ctx.output.json(&SortReport {
            fingerprint: catalog.fingerprint(),
            resolution: &resolution,
        });
    }

    ctx.output.step(
        "📦",
        &format!("Resolved {} packages from {}", resolution.len(), path),
    );
    for line in render_order(&catalog, &resolution) {
        ctx.output.line(&line);
    }

    if resolution.had_cycle {
        ctx.output.warn(&format!(
            "Circular load order: {} package(s) kept in catalog order: {}",
            resolution.unresolved.len(),
            resolution
                .unresolved
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        ctx.output.info("Run 'loadout cycles' to see what causes it.");
    } else {
        ctx.output.success(&format!(
            "Order satisfies {} constraint(s), {} priority swap(s) in {:.2}ms",
            resolution.edge_count,
            resolution.swaps,
            start_time.elapsed().as_secs_f64() * 1000.0
        ));
    }

    Ok(())
}

/// Numbered order lines, e.g. `   1  Ludeon.RimWorld (Core)  # base game`
///
/// The display name is shown when it differs from the id, followed by the
/// package remark if there is one.
pub fn render_order(catalog: &Catalog, resolution: &Resolution) -> Vec<String> {
    resolution
        .order
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let mut line = format!("{:>4}  {}", index + 1, id);
            if let Some(package) = catalog.get(id) {
                if package.display_name() != id.as_str() {
                    line.push_str(&format!(" ({})", package.display_name()));
                }
                if let Some(remark) = &package.remark {
                    line.push_str(&format!("  # {}", remark));
                }
            }
            line
        })
        .collect()
}

//! `loadout check` command implementation.
//!
//! Reads an existing order (one id per line, `#` starts a comment) and
//! reports every constraint it breaks.

use camino::Utf8PathBuf;
use loadout_core::error::{LoadoutError, LoadoutResult};
use loadout_core::types::{Catalog, PackageId};
use loadout_resolver::{ConstraintGraph, OrderViolation};
use serde::Serialize;

use super::{load_catalog_only, CommandContext};
use crate::CatalogArgs;

/// Findings for one order file
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Constraints the order breaks
    pub violations: Vec<OrderViolation>,
    /// Ids in the order the catalog does not know
    pub unknown: Vec<PackageId>,
    /// Catalog packages absent from the order
    pub missing: Vec<PackageId>,
    /// Ids listed more than once
    pub duplicates: Vec<PackageId>,
}

impl CheckReport {
    /// Check an order against a catalog
    pub fn build(catalog: &Catalog, order: &[PackageId]) -> Self {
        let graph = ConstraintGraph::build(catalog);
        let mut report = Self {
            violations: graph.violations(order),
            ..Self::default()
        };

        for (index, id) in order.iter().enumerate() {
            if !catalog.contains(id) && !report.unknown.contains(id) {
                report.unknown.push(id.clone());
            }
            if order[..index].contains(id) && !report.duplicates.contains(id) {
                report.duplicates.push(id.clone());
            }
        }

        report.missing = catalog.ids().filter(|id| !order.contains(*id)).cloned().collect();
        report
    }

    /// Whether the order respects every constraint
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Parse an order file
pub fn parse_order(content: &str) -> Vec<PackageId> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then(|| PackageId::new(line))
        })
        .collect()
}

/// Execute the `loadout check` command
pub async fn execute(order_path: Utf8PathBuf, source: CatalogArgs, ctx: &CommandContext) -> LoadoutResult<()> {
    let (catalog, _) = load_catalog_only(ctx, source.catalog.as_deref()).await?;

    let order_path = ctx.cwd.join(order_path);
    let content = tokio::fs::read_to_string(&order_path)
        .await
        .map_err(|e| LoadoutError::io(format!("Failed to read {}", order_path), e))?;
    let order = parse_order(&content);

    let report = CheckReport::build(&catalog, &order);

    if source.json {
        return ctx.output.json(&report);
    }

    if report.is_valid() {
        ctx.output.success(&format!(
            "{} respects every constraint ({} packages)",
            order_path,
            order.len()
        ));
    } else {
        ctx.output.warn(&format!("{} violated constraint(s):", report.violations.len()));
        for violation in &report.violations {
            ctx.output.line(&format!("  {}", violation));
        }
    }

    for (label, ids) in [
        ("Unknown ids (ignored)", &report.unknown),
        ("Missing from the order", &report.missing),
        ("Listed more than once", &report.duplicates),
    ] {
        if !ids.is_empty() {
            let ids: Vec<&str> = ids.iter().map(PackageId::as_str).collect();
            ctx.output.info(&format!("{}: {}", label, ids.join(", ")));
        }
    }

    Ok(())
}

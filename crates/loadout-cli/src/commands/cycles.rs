//! `loadout cycles` command implementation.

use loadout_core::error::LoadoutResult;
use loadout_core::types::{Catalog, PackageId};
use loadout_resolver::cycles::cycle_members;
use loadout_resolver::{cycle_groups, ConstraintGraph, CycleGroup};
use serde::Serialize;

use super::{load_catalog_only, CommandContext};
use crate::CatalogArgs;

/// Cycle diagnostics for one catalog
#[derive(Debug, Serialize)]
pub struct CycleReport {
    /// Every package the sort cannot place, in catalog order
    pub members: Vec<PackageId>,
    /// The cycles themselves
    pub groups: Vec<CycleGroup>,
    /// Members that only wait on a cycle
    pub blocked: Vec<PackageId>,
}

impl CycleReport {
    /// Build the report for a catalog
    pub fn build(catalog: &Catalog) -> Self {
        let graph = ConstraintGraph::build(catalog);
        let members: Vec<PackageId> = cycle_members(&graph)
            .into_iter()
            .map(|node| graph.id(node).clone())
            .collect();
        let groups = cycle_groups(&graph);

        let blocked = members
            .iter()
            .filter(|id| !groups.iter().any(|group| group.members.contains(*id)))
            .cloned()
            .collect();

        Self {
            members,
            groups,
            blocked,
        }
    }

    /// Whether the catalog is acyclic
    pub fn is_clean(&self) -> bool {
        self.members.is_empty()
    }
}

/// Execute the `loadout cycles` command
pub async fn execute(source: CatalogArgs, ctx: &CommandContext) -> LoadoutResult<()> {
    let (catalog, path) = load_catalog_only(ctx, source.catalog.as_deref()).await?;
    let report = CycleReport::build(&catalog);

    if source.json {
        return ctx.output.json(&report);
    }

    if report.is_clean() {
        ctx.output
            .success(&format!("No cycles among {} packages in {}", catalog.len(), path));
        return Ok(());
    }

    ctx.output.warn(&format!(
        "{} package(s) cannot be placed in a valid order",
        report.members.len()
    ));
    for group in &report.groups {
        ctx.output.line(&format!("  cycle: {}", group.describe()));
    }
    if !report.blocked.is_empty() {
        let blocked: Vec<&str> = report.blocked.iter().map(PackageId::as_str).collect();
        ctx.output.line(&format!("  blocked: {}", blocked.join(", ")));
    }

    Ok(())
}

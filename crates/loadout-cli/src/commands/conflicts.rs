//! `loadout conflicts` command implementation.

use loadout_core::error::LoadoutResult;
use loadout_resolver::find_incompatibilities;

use super::{load_catalog_only, CommandContext};
use crate::CatalogArgs;

/// Execute the `loadout conflicts` command
pub async fn execute(source: CatalogArgs, ctx: &CommandContext) -> LoadoutResult<()> {
    let (catalog, path) = load_catalog_only(ctx, source.catalog.as_deref()).await?;
    let conflicts = find_incompatibilities(&catalog);

    if source.json {
        return ctx.output.json(&conflicts);
    }

    if conflicts.is_empty() {
        ctx.output.success(&format!("No incompatible packages in {}", path));
        return Ok(());
    }

    ctx.output.warn(&format!("{} incompatible pair(s):", conflicts.len()));
    for conflict in &conflicts {
        ctx.output.line(&format!("  {}", conflict));
    }

    Ok(())
}

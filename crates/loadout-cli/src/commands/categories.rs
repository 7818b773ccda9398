//! `loadout categories` command implementation.

use loadout_config::LoadoutToml;
use loadout_core::error::LoadoutResult;
use loadout_core::types::{CategoryRegistry, UNLISTED_RANK};
use serde::Serialize;

use super::{load_config, CommandContext};

/// One category as shown to the user
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub name: String,
    /// Whether the category comes from settings rather than the defaults
    pub custom: bool,
    /// Position in the priority list, if listed
    pub priority: Option<usize>,
    /// Named by the priority list but unknown to the registry
    pub unknown: bool,
}

/// Registry categories followed by unknown priority entries
pub fn category_rows(settings: &LoadoutToml) -> Vec<CategoryRow> {
    let registry = settings.registry();
    let priority = settings.category_priority();
    let rank = |name: &str| Some(priority.rank(name)).filter(|rank| *rank != UNLISTED_RANK);

    let mut rows: Vec<CategoryRow> = registry
        .all()
        .into_iter()
        .map(|name| CategoryRow {
            name: name.to_string(),
            custom: !CategoryRegistry::is_default(name),
            priority: rank(name),
            unknown: false,
        })
        .collect();

    for name in priority.categories() {
        if !registry.contains(name) {
            rows.push(CategoryRow {
                name: name.to_string(),
                custom: false,
                priority: rank(name),
                unknown: true,
            });
        }
    }

    rows
}

/// Execute the `loadout categories` command
pub async fn execute(json: bool, ctx: &CommandContext) -> LoadoutResult<()> {
    let config = load_config(ctx, Default::default()).await?;
    let rows = category_rows(&config.settings);

    if json {
        return ctx.output.json(&rows);
    }

    ctx.output.heading("Categories");
    for row in &rows {
        let priority = row
            .priority
            .map(|rank| format!("#{}", rank + 1))
            .unwrap_or_else(|| "-".to_string());
        let note = match (row.custom, row.unknown) {
            (_, true) => "  (not registered)",
            (true, false) => "  (custom)",
            (false, false) => "",
        };
        ctx.output.line(&format!("  {:>4}  {}{}", priority, row.name, note));
    }

    if config.settings.priority.categories.is_empty() {
        ctx.output
            .info("No priority set; add [priority] categories to loadout.toml or pass --priority to sort.");
    }

    Ok(())
}

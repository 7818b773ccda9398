//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking a `CommandContext`. Commands
//! that read a catalog share the settings and catalog loading below.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use loadout_config::{load_catalog, ConfigLoader, LoadedConfig};
use loadout_core::error::{LoadoutError, LoadoutResult};
use loadout_core::types::Catalog;
use tracing::{debug, info};

pub mod categories;
pub mod check;
pub mod conflicts;
pub mod cycles;
pub mod sort;


use crate::{output::OutputHandler, Commands};

/// Commands offered when a typo is detected
const COMMANDS: &[&str] = &["sort", "cycles", "check", "conflicts", "categories", "version", "help"];

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub config_loader: ConfigLoader,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// `no_color` forces plain output even on a color terminal.
    pub fn new(no_color: bool) -> LoadoutResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| LoadoutError::io("Failed to get current directory", e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| LoadoutError::invalid("cwd", format!("Working directory is not UTF-8: {}", e)))?;

        Ok(Self {
            config_loader: ConfigLoader::new(cwd.clone()),
            cwd,
            output: if no_color {
                OutputHandler::plain()
            } else {
                OutputHandler::new()
            },
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> LoadoutResult<()> {
    match command {
        Commands::Sort {
            source,
            priority,
            strict,
        } => {
            info!("Resolving load order (strict: {})", strict);
            sort::execute(source, priority, strict, ctx).await
        },
        Commands::Cycles { source } => {
            info!("Checking for cycles");
            cycles::execute(source, ctx).await
        },
        Commands::Check { order, source } => {
            info!("Checking order file: {}", order);
            check::execute(order, source, ctx).await
        },
        Commands::Conflicts { source } => {
            info!("Checking for incompatible packages");
            conflicts::execute(source, ctx).await
        },
        Commands::Categories { json } => categories::execute(json, ctx).await,
        Commands::Version => show_version(ctx),
    }
}

/// Build the command-line override layer for the config loader
pub fn cli_overrides(
    catalog: Option<&Utf8Path>,
    priority: Option<&[String]>,
    strict: bool,
) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    if let Some(catalog) = catalog {
        overrides.insert("catalog".to_string(), catalog.to_string());
    }
    if let Some(priority) = priority {
        overrides.insert("priority".to_string(), priority.join(","));
    }
    if strict {
        overrides.insert("strict".to_string(), "true".to_string());
    }
    overrides
}

/// Load layered settings as seen from the working directory
pub async fn load_config(ctx: &CommandContext, overrides: HashMap<String, String>) -> LoadoutResult<LoadedConfig> {
    let config = ctx.config_loader.load(overrides).await?;
    debug!(sources = ?config.sources, "Loaded settings");
    Ok(config)
}

/// Load the catalog the settings point at, with `[packages]` assignments applied
///
/// Relative paths from flags or the environment are taken from the working
/// directory.
pub async fn load_configured_catalog(
    ctx: &CommandContext,
    config: &LoadedConfig,
) -> LoadoutResult<(Catalog, Utf8PathBuf)> {
    let path = config.settings.catalog.path.as_ref().ok_or_else(|| {
        LoadoutError::invalid(
            "catalog.path",
            "No catalog given; pass --catalog or set [catalog] path in loadout.toml",
        )
    })?;
    let path = ctx.cwd.join(path);

    let catalog = load_catalog(&path).await?;
    Ok((config.settings.apply_package_overrides(&catalog), path))
}

/// Load settings and catalog for a command that only takes `--catalog`
pub async fn load_catalog_only(
    ctx: &CommandContext,
    catalog: Option<&Utf8Path>,
) -> LoadoutResult<(Catalog, Utf8PathBuf)> {
    let config = load_config(ctx, cli_overrides(catalog, None, false)).await?;
    load_configured_catalog(ctx, &config).await
}

/// Report a bare word that is not a command
pub fn unknown_command(input: &str, ctx: &CommandContext) -> LoadoutResult<()> {
    ctx.output.error(&format!("Unknown command '{}'", input));
    if let Some(suggestion) = suggest_similar_command(input) {
        ctx.output.info(&format!("Did you mean '{}'?", suggestion));
    }
    ctx.output.info("Run 'loadout help' to see available commands.");

    Err(LoadoutError::invalid("command", format!("Unknown command: {}", input)))
}

/// Show help information
pub fn show_help(ctx: &CommandContext) -> LoadoutResult<()> {
    ctx.output.line("loadout - load-order resolution for mod packages");
    ctx.output.line("");
    ctx.output.line("Usage: loadout [COMMAND] [OPTIONS]");
    ctx.output.line("");
    ctx.output.line("Ordering:");
    ctx.output.line("  sort           Resolve and print the load order");
    ctx.output.line("  check          Check an existing order against the catalog");
    ctx.output.line("");
    ctx.output.line("Diagnostics:");
    ctx.output.line("  cycles         Show packages caught in or blocked by cycles");
    ctx.output.line("  conflicts      List incompatible packages present together");
    ctx.output.line("  categories     List known categories and their priority");
    ctx.output.line("");
    ctx.output.line("Meta:");
    ctx.output.line("  version        Show version information");
    ctx.output.line("");
    ctx.output.line("Run 'loadout <command> --help' for more information on a command.");
    Ok(())
}

fn show_version(ctx: &CommandContext) -> LoadoutResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.line(&format!("loadout v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.info(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Suggest similar commands based on edit distance
pub fn suggest_similar_command(input: &str) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for &command in COMMANDS {
        let distance = edit_distance(input, command);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(command);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the full matrix
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

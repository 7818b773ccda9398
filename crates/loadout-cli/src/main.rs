//! # loadout-cli
//!
//! Command-line front end for the loadout load-order engine.
//!
//! Parses arguments, sets up logging and error reporting, loads settings and
//! the package catalog, and hands them to the resolver.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use loadout_core::error::{LoadoutError, LoadoutResult};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::colors::ColorSupport;
use output::errors::ErrorFormatter;

/// Resolve a load order for interdependent mod packages
#[derive(Parser)]
#[command(name = "loadout", version, about = "Load-order resolution for mod packages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Unrecognized command, checked for typos
    #[arg(value_name = "COMMAND", hide = true)]
    pub input: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never emit ANSI color codes
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Catalog selection shared by every catalog-reading command
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Catalog file (.toml or .json); defaults to [catalog] path in loadout.toml
    #[arg(short, long, value_name = "PATH")]
    pub catalog: Option<Utf8PathBuf>,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print the load order
    Sort {
        #[command(flatten)]
        source: CatalogArgs,
        /// Category priority, most preferred first
        #[arg(short, long, value_delimiter = ',', value_name = "CATEGORIES")]
        priority: Option<Vec<String>>,
        /// Fail instead of returning a best-effort order on cycles
        #[arg(long)]
        strict: bool,
    },
    /// Show packages caught in or blocked by cycles
    Cycles {
        #[command(flatten)]
        source: CatalogArgs,
    },
    /// Check an existing order against the catalog's constraints
    Check {
        /// Order file, one package id per line
        #[arg(short, long, value_name = "PATH")]
        order: Utf8PathBuf,
        #[command(flatten)]
        source: CatalogArgs,
    },
    /// List incompatible packages present together
    Conflicts {
        #[command(flatten)]
        source: CatalogArgs,
    },
    /// List known categories and their priority
    Categories {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting loadout v{}", env!("CARGO_PKG_VERSION"));

    let formatter = if cli.no_color {
        ErrorFormatter::with_colors(ColorSupport::disabled())
    } else {
        ErrorFormatter::new()
    };

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", formatter.format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> LoadoutResult<()> {
    // Settings and catalogs are read with tokio::fs
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| LoadoutError::io("Failed to create async runtime", e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.no_color)?;

        match cli.command {
            Some(command) => commands::dispatch_command(command, &ctx).await,
            None => match cli.input {
                Some(input) => commands::unknown_command(&input, &ctx),
                None => commands::show_help(&ctx),
            },
        }
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "loadout={level},loadout_core={level},loadout_config={level},loadout_resolver={level}"
        ))
    });

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("loadout encountered an unexpected error: {}", panic_info);
        eprintln!("loadout crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/loadout-rs/loadout/issues");
        eprintln!("Error: {}", panic_info);
    }));
}

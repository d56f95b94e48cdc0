// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `GoMarket` CLI - manage the persisted shopping cart from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show the cart (default if no command specified)
//! gomarket
//!
//! # Add a product
//! gomarket add p1 "Running Shoe" https://img.example/p1.png 129.9
//!
//! # Change quantities
//! gomarket increment p1
//! gomarket decrement p1
//!
//! # JSON output
//! gomarket list --format json --pretty
//!
//! # Use a different storage file
//! gomarket --data-file /tmp/cart.json list
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gomarket_store::{CartConfig, LogLevel, StoreError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{add, adjust, list, path, reset};

// ============================================================================
// CLI Definition
// ============================================================================

/// `GoMarket` CLI - persisted shopping cart.
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(about = "Persisted shopping cart CLI")]
#[command(long_about = r#"
GoMarket keeps a shopping cart on disk and updates it one command at a time.

Every change is written to the storage file before the command returns.
Quantities never drop below zero; decrementing to zero keeps the entry.

Examples:
  gomarket                              # Show the cart
  gomarket add p1 "Shoe" <image> 10.0   # Add a product (or one more of it)
  gomarket increment p1                 # One more
  gomarket decrement p1                 # One less
  gomarket --format json                # JSON output
  gomarket reset                        # Empty the cart
"#)]
#[command(version)]
#[command(author = "GoMarketplace Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'list' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Storage file to use instead of the configured one.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Storage namespace to use instead of the configured one.
    #[arg(long, short, global = true)]
    pub namespace: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the cart (default if no command specified).
    #[command(visible_alias = "ls")]
    List,

    /// Add a product, or one more of it if already in the cart.
    #[command(visible_alias = "a")]
    Add(add::AddArgs),

    /// Add one unit of a product already in the cart.
    #[command(visible_alias = "inc")]
    Increment(adjust::AdjustArgs),

    /// Remove one unit of a product, stopping at zero.
    #[command(visible_alias = "dec")]
    Decrement(adjust::AdjustArgs),

    /// Show configuration and storage paths.
    Path,

    /// Remove the stored cart.
    Reset,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Storage could not be read or written.
    Storage = 2,
    /// Stored cart could not be parsed.
    Corrupt = 3,
    /// Bad input or configuration.
    InvalidInput = 4,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::PersistenceReadFailed { .. } | StoreError::PersistenceWriteFailed { .. }) => {
                ExitCode::Storage
            }
            Some(StoreError::CorruptPersistedState { .. }) => ExitCode::Corrupt,
            Some(StoreError::InvalidItem(_) | StoreError::Config(_)) => ExitCode::InvalidInput,
            _ => ExitCode::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("gomarket=debug,info")
    } else {
        EnvFilter::new(format!("gomarket={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(&cli);
    let level = config.as_ref().map_or(LogLevel::default(), |c| c.log_level);
    setup_logging(cli.verbose, cli.quiet, level);

    let result = match config {
        Ok(config) => run(&cli, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

async fn run(cli: &Cli, config: &CartConfig) -> Result<()> {
    match &cli.command {
        Some(Commands::List) | None => list::run(cli, config).await,
        Some(Commands::Add(args)) => add::run(args, cli, config).await,
        Some(Commands::Increment(args)) => adjust::run(args, adjust::Direction::Up, cli, config).await,
        Some(Commands::Decrement(args)) => adjust::run(args, adjust::Direction::Down, cli, config).await,
        Some(Commands::Path) => path::run(cli, config),
        Some(Commands::Reset) => reset::run(cli, config).await,
    }
}

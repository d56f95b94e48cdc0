//! Increment and decrement commands - change a product's quantity.

use anyhow::Result;
use clap::Args;
use gomarket_store::CartConfig;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct AdjustArgs {
    /// Product id.
    pub id: String,
}

/// Which way the quantity moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One more unit.
    Up,
    /// One less unit, stopping at zero.
    Down,
}

impl Direction {
    fn action(self) -> &'static str {
        match self {
            Direction::Up => "increment",
            Direction::Down => "decrement",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Direction::Up => "Incremented",
            Direction::Down => "Decremented",
        }
    }
}

/// Runs the increment or decrement command.
///
/// An id that is not in the cart is reported but is not an error.
pub async fn run(args: &AdjustArgs, direction: Direction, cli: &Cli, config: &CartConfig) -> Result<()> {
    let store = super::open_cart(config).await?;

    let cart = match direction {
        Direction::Up => store.increment(&args.id).await?,
        Direction::Down => store.decrement(&args.id).await?,
    };

    let item = cart.get(&args.id);
    info!(id = %args.id, action = direction.action(), found = item.is_some(), "Quantity adjusted");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if !cli.quiet {
                println!("{}", formatter.format_change(direction.label(), &args.id, item));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let updated_at = store.last_committed().await;
            println!(
                "{}",
                formatter.format_change(direction.action(), &args.id, &cart, updated_at)?
            );
        }
    }

    Ok(())
}

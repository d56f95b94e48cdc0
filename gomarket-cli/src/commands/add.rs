//! Add command - put a product in the cart.

use anyhow::Result;
use clap::Args;
use gomarket_core::NewLineItem;
use gomarket_store::CartConfig;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image URL.
    pub image_url: String,

    /// Unit price.
    pub price: f64,
}

/// Runs the add command.
///
/// Re-adding a product already in the cart adds one unit and keeps the
/// stored title, image and price.
pub async fn run(args: &AddArgs, cli: &Cli, config: &CartConfig) -> Result<()> {
    let store = super::open_cart(config).await?;

    let item = NewLineItem::new(
        args.id.as_str(),
        args.title.as_str(),
        args.image_url.as_str(),
        args.price,
    );
    let cart = store.add_to_cart(item).await?;

    info!(id = %args.id, "Added to cart");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if !cli.quiet {
                println!("{}", formatter.format_change("Added", &args.id, cart.get(&args.id)));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let updated_at = store.last_committed().await;
            println!("{}", formatter.format_change("add", &args.id, &cart, updated_at)?);
        }
    }

    Ok(())
}

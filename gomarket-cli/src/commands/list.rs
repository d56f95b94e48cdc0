//! List command - show the cart.

use anyhow::Result;
use gomarket_store::CartConfig;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the list command.
pub async fn run(cli: &Cli, config: &CartConfig) -> Result<()> {
    let store = super::open_cart(config).await?;
    let cart = store.products().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_cart(&cart));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_cart(&cart)?);
        }
    }

    Ok(())
}

//! Path command - show where configuration and the cart live.

use anyhow::Result;
use gomarket_store::{CartConfig, default_config_dir};

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Runs the path command.
pub fn run(cli: &Cli, config: &CartConfig) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = CartConfig::default_path();
    let data_file = config.data_file_path();
    let key = config.storage_key();

    match cli.format {
        OutputFormat::Text => {
            println!("Cart Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:   {}", config_dir.display());
            println!("Config file:  {}", config_file.display());
            println!("Storage file: {}", data_file.display());
            println!("Storage key:  {key}");
            println!("Ordering:     {}", config.ordering);
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
                "storage_file": data_file.display().to_string(),
                "storage_key": key,
                "ordering": config.ordering,
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

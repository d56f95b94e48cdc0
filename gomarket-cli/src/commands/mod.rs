//! CLI command implementations.

pub mod add;
pub mod adjust;
pub mod list;
pub mod path;
pub mod reset;

use std::sync::Arc;

use anyhow::Result;
use gomarket_store::{CartConfig, CartStore, FileStore};
use tracing::debug;

use crate::Cli;

/// Loads the config file and applies command-line overrides.
pub fn load_config(cli: &Cli) -> Result<CartConfig> {
    let mut config = CartConfig::load()?;

    if let Some(path) = &cli.data_file {
        config.data_file = Some(path.clone());
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace.clone_from(namespace);
    }

    config.validate()?;
    Ok(config)
}

/// Opens the file-backed cart and restores it.
///
/// A corrupt or unreadable cart is an error here; `gomarket reset` clears it.
pub async fn open_cart(config: &CartConfig) -> Result<CartStore> {
    let path = config.data_file_path();
    debug!(path = %path.display(), key = %config.storage_key(), "Opening cart");

    let store = CartStore::new(Arc::new(FileStore::new(path)), config);
    store.initialize().await?;
    Ok(store)
}

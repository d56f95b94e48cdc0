//! Reset command - remove the stored cart.

use std::path::PathBuf;

use anyhow::Result;
use gomarket_core::{KeyValueStore, KvError};
use gomarket_store::{CartConfig, FileStore};
use tracing::{info, warn};

use crate::Cli;

/// What a reset did.
#[derive(Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The cart's key was removed.
    Cleared,
    /// Nothing was stored under the cart's key.
    NothingStored,
    /// The storage file could not be parsed and was moved aside.
    Quarantined(PathBuf),
}

/// Runs the reset command.
pub async fn run(cli: &Cli, config: &CartConfig) -> Result<()> {
    let kv = FileStore::new(config.data_file_path());
    let outcome = reset_cart(&kv, &config.storage_key()).await?;

    if !cli.quiet {
        match outcome {
            ResetOutcome::Cleared => println!("Cart cleared"),
            ResetOutcome::NothingStored => println!("No stored cart to reset"),
            ResetOutcome::Quarantined(moved) => {
                println!("Storage file was unreadable; moved to {}", moved.display());
            }
        }
    }

    Ok(())
}

/// Removes the cart's key from `kv`.
///
/// Other namespaces in the same storage file are kept. A file that does not
/// parse is moved aside instead, since no key in it can be read.
pub async fn reset_cart(kv: &FileStore, key: &str) -> Result<ResetOutcome> {
    match kv.get(key).await {
        Ok(Some(_)) => {
            kv.remove(key).await?;
            info!(key = %key, path = %kv.path().display(), "Cart reset");
            Ok(ResetOutcome::Cleared)
        }
        Ok(None) => Ok(ResetOutcome::NothingStored),
        Err(KvError::Serialization(e)) => {
            warn!(path = %kv.path().display(), error = %e, "Storage file is corrupt");
            Ok(ResetOutcome::Quarantined(kv.quarantine().await?))
        }
        Err(e) => Err(e.into()),
    }
}

//! Store error types.

use gomarket_core::{CoreError, KvError};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart handle was used after its store went away.
    #[error("Cart context unavailable: the cart store has been dropped")]
    ContextUnavailable,

    /// The persisted cart could not be parsed.
    #[error("Persisted cart under {key} is corrupt: {source}")]
    CorruptPersistedState {
        /// Storage key that was read.
        key: String,
        /// Parse failure.
        #[source]
        source: CoreError,
    },

    /// Reading the persisted cart failed.
    #[error("Failed to read cart from {key}: {source}")]
    PersistenceReadFailed {
        /// Storage key that was read.
        key: String,
        /// Backend failure.
        #[source]
        source: KvError,
    },

    /// Writing the cart failed. The in-memory cart was still updated.
    #[error("Failed to write cart to {key}: {source}")]
    PersistenceWriteFailed {
        /// Storage key that was written.
        key: String,
        /// Backend failure.
        #[source]
        source: KvError,
    },

    /// An item handed to the cart failed validation.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Cart model error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

//! Core error types for `GoMarket`.

use thiserror::Error;

/// Core error type for cart model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two line items share the same product id.
    #[error("Duplicate product id in cart: {0}")]
    DuplicateId(String),

    /// A line item carries an invalid field.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum KvError {
    /// IO error from a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused or could not serve the request.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

//! Trait definitions for `GoMarket`.
//!
//! The cart never talks to a storage engine directly. It is handed a
//! [`KeyValueStore`] and only ever reads and writes string values by key.

use async_trait::async_trait;

use crate::error::KvError;

/// Async key-value persistence collaborator.
///
/// Implementors are responsible for:
/// - Returning the last value stored under a key, or `None`
/// - Durably replacing the value under a key
///
/// A completed `set` means the value is committed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Value found
    /// * `Ok(None)` - Nothing stored under `key`
    /// * `Err(e)` - The backend could not be read
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Stores `value` under `key`, overwriting any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Removes the value stored under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), KvError>;

    /// Checks if a value exists under `key`.
    async fn contains(&self, key: &str) -> bool {
        matches!(self.get(key).await, Ok(Some(_)))
    }
}

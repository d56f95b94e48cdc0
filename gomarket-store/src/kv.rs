//! Key-value store backends.
//!
//! Two implementations of [`KeyValueStore`]:
//!
//! - [`MemoryStore`] - Process-local map. Clones share the same map, which
//!   lets tests drop a cart and reopen it against the same storage.
//! - [`FileStore`] - A single JSON file holding a `{key: value}` object,
//!   rewritten atomically on every `set`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use gomarket_core::{KeyValueStore, KvError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::persistence::{load_json, save_json};

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        trace!(key = %key, "Memory get");
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        trace!(key = %key, bytes = value.len(), "Memory set");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        trace!(key = %key, "Memory remove");
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// File Store
// ============================================================================

/// JSON-file key-value store.
///
/// Every operation re-reads the file, so two processes pointed at the same
/// path see each other's committed writes. Within one process, writes are
/// serialized so read-modify-write cycles don't clobber each other.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves an unreadable storage file aside to `<file>.corrupt`.
    ///
    /// Every key in the file is lost to the store; the next write starts a
    /// fresh file. Returns where the old file went.
    ///
    /// # Errors
    ///
    /// Returns `KvError::Io` if the file cannot be renamed.
    pub async fn quarantine(&self) -> Result<PathBuf, KvError> {
        let _guard = self.write_lock.lock().await;
        let target = self.path.with_extension("json.corrupt");
        tokio::fs::rename(&self.path, &target).await?;
        warn!(
            path = %self.path.display(),
            moved_to = %target.display(),
            "Moved unreadable storage file aside"
        );
        Ok(target)
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, KvError> {
        match load_json(&self.path).await {
            Ok(entries) => Ok(entries),
            Err(KvError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Storage file not found, treating as empty");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        save_json(&self.path, &entries).await?;
        debug!(path = %self.path.display(), key = %key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            save_json(&self.path, &entries).await?;
            debug!(path = %self.path.display(), key = %key, "Removed value");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Configuration management.

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_storage_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketplace";

/// Suffix appended to the namespace to form the cart's storage key.
const PRODUCTS_SUFFIX: &str = "products";

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Prefix of the storage key.
    pub namespace: String,
    /// How concurrent mutations are ordered.
    pub ordering: MutationOrdering,
    /// Storage file for the file-backed store. `None` uses the default path.
    pub data_file: Option<PathBuf>,
    /// Log level for the CLI when not running verbose.
    pub log_level: LogLevel,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ordering: MutationOrdering::default(),
            data_file: None,
            log_level: LogLevel::default(),
        }
    }
}

/// Ordering of concurrent cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationOrdering {
    /// One mutation at a time: compute, write and publish run under a lock.
    #[default]
    Serialized,
    /// No mutual exclusion. Each mutation works from the cart as it was when
    /// it started; the last publish wins in memory and the last completed
    /// write wins on disk.
    Unordered,
}

impl std::fmt::Display for MutationOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationOrdering::Serialized => write!(f, "serialized"),
            MutationOrdering::Unordered => write!(f, "unordered"),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl CartConfig {
    /// Storage key for the cart snapshot, e.g. `@GoMarketplace:products`.
    pub fn storage_key(&self) -> String {
        format!("{}:{PRODUCTS_SUFFIX}", self.namespace)
    }

    /// Storage file for the file-backed store.
    pub fn data_file_path(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_storage_path)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: CartConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks the configuration for values the store cannot use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the namespace is blank.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.namespace.trim().is_empty() {
            return Err(StoreError::Config("namespace must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_key() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "@GoMarketplace:products");
        assert_eq!(config.ordering, MutationOrdering::Serialized);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_custom_namespace() {
        let config = CartConfig {
            namespace: "@Shop".into(),
            ..CartConfig::default()
        };
        assert_eq!(config.storage_key(), "@Shop:products");
    }

    #[test]
    fn test_data_file_override() {
        let config = CartConfig {
            data_file: Some(PathBuf::from("/tmp/cart.json")),
            ..CartConfig::default()
        };
        assert_eq!(config.data_file_path(), PathBuf::from("/tmp/cart.json"));
        assert!(CartConfig::default().data_file_path().ends_with("storage.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"ordering":"unordered"}"#).unwrap();
        assert_eq!(config.ordering, MutationOrdering::Unordered);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = CartConfig::load_from(Path::new("/nonexistent/gomarket/config.json")).unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = CartConfig {
            namespace: "@Test".into(),
            ordering: MutationOrdering::Unordered,
            data_file: Some(dir.path().join("storage.json")),
            log_level: LogLevel::Debug,
        };

        config.save_to(&path).unwrap();
        assert_eq!(CartConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_blank_namespace_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"namespace":"  "}"#).unwrap();

        assert!(matches!(CartConfig::load_from(&path), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(MutationOrdering::Unordered.to_string(), "unordered");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}

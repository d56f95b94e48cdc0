// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarket` Store
//!
//! Persistent cart state for the `GoMarket` application.
//!
//! This crate provides:
//!
//! - **`CartStore`**: Owns the cart, writes it through on every change and
//!   notifies subscribers
//! - **`CartHandle`**: Non-owning access that fails cleanly once the store is gone
//! - **Key-value backends**: In-memory and JSON-file implementations
//! - **Config**: Namespace, mutation ordering and storage location
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gomarket_core::NewLineItem;
//! use gomarket_store::{CartConfig, CartStore, FileStore};
//!
//! let config = CartConfig::load()?;
//! let kv = Arc::new(FileStore::new(config.data_file_path()));
//! let store = CartStore::open(kv, &config).await;
//!
//! store.add_to_cart(NewLineItem::new("p1", "Shoe", "https://img/1", 10.0)).await?;
//!
//! let mut rx = store.watch();
//! while rx.changed().await.is_ok() {
//!     println!("Cart now has {} items", rx.borrow().len());
//! }
//! ```

pub mod cart_store;
pub mod config;
pub mod error;
pub mod kv;
pub mod persistence;

pub use cart_store::{CartHandle, CartStore, StoreState, SubscriptionId};
pub use config::{CartConfig, DEFAULT_NAMESPACE, LogLevel, MutationOrdering};
pub use error::StoreError;
pub use kv::{FileStore, MemoryStore};
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, default_storage_path, load_json,
    save_json,
};

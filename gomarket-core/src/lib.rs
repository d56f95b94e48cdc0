// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarket` Core
//!
//! Core types and rules for the `GoMarket` shopping cart.
//!
//! This crate holds everything that does not touch I/O:
//!
//! - Cart models ([`LineItem`], [`NewLineItem`], [`CartSnapshot`])
//! - The snapshot transitions (add, increment, decrement)
//! - The wire format used to persist a snapshot
//! - Error types
//! - The [`KeyValueStore`] trait that persistence backends implement
//!
//! ## Key Types
//!
//! - [`CartSnapshot`] - Ordered line items, unique by product id
//! - [`LineItem`] - One product entry with a quantity
//! - [`NewLineItem`] - The input to an add, without a quantity
//! - [`KeyValueStore`] - Async get/set-by-key persistence collaborator

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{CoreError, KvError};

// Re-export model types
pub use models::{CartSnapshot, LineItem, NewLineItem};

// Re-export traits
pub use traits::KeyValueStore;

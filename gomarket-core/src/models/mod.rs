//! Domain models for `GoMarket`.
//!
//! ## Submodules
//!
//! - [`line_item`] - A single cart entry and the input to an add
//! - [`snapshot`] - The ordered, id-unique collection of entries

mod line_item;
mod snapshot;

pub use line_item::{LineItem, NewLineItem};
pub use snapshot::CartSnapshot;

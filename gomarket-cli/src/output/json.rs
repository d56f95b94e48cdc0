//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use gomarket_core::{CartSnapshot, LineItem};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the whole cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOutput {
    pub items: Vec<ItemOutput>,
    pub item_count: usize,
    pub total_quantity: u64,
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single line item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Result of a single mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOutput {
    pub action: String,
    pub id: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub cart: CartOutput,
}

impl From<&LineItem> for ItemOutput {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the whole cart.
    pub fn format_cart(&self, cart: &CartSnapshot) -> Result<String> {
        self.format(&Self::cart_output(cart, None))
    }

    /// Formats the outcome of a single mutation together with the new cart.
    pub fn format_change(
        &self,
        action: &str,
        id: &str,
        cart: &CartSnapshot,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let item = cart.get(id);
        let output = ChangeOutput {
            action: action.to_string(),
            id: id.to_string(),
            found: item.is_some(),
            quantity: item.map(|i| i.quantity),
            cart: Self::cart_output(cart, updated_at),
        };
        self.format(&output)
    }

    /// Converts a snapshot to output.
    fn cart_output(cart: &CartSnapshot, updated_at: Option<DateTime<Utc>>) -> CartOutput {
        CartOutput {
            items: cart.iter().map(ItemOutput::from).collect(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
            updated_at,
        }
    }
}

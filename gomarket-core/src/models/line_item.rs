//! Line item types.
//!
//! This module contains the two shapes a product takes in the cart:
//! - [`NewLineItem`] - What a caller hands to an add
//! - [`LineItem`] - A stored entry with its quantity
//!
//! Both serialize with the persisted field names (`image_url`, `price`).
//! The camelCase spellings `imageUrl` and `unitPrice` are accepted on read.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Line Item
// ============================================================================

/// A product entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable product identifier, unique per cart.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Price of a single unit.
    #[serde(rename = "price", alias = "unitPrice")]
    pub unit_price: f64,
    /// Units in the cart. May be zero; the entry is kept.
    pub quantity: u32,
}

impl LineItem {
    /// Price of the whole line (unit price × quantity).
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Validates the entry's fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the id is empty or the price is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_fields(&self.id, self.unit_price)
    }
}

// ============================================================================
// New Line Item
// ============================================================================

/// A product to add to the cart. Carries no quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Stable product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    /// Price of a single unit.
    #[serde(rename = "price", alias = "unitPrice")]
    pub unit_price: f64,
}

impl NewLineItem {
    /// Creates a new item to add.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            unit_price,
        }
    }

    /// Validates the item before it enters a cart.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the id is empty or the price is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_fields(&self.id, self.unit_price)
    }

    /// Converts into a stored entry with a quantity of one.
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            unit_price: self.unit_price,
            quantity: 1,
        }
    }
}

fn validate_fields(id: &str, unit_price: f64) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::InvalidData("product id must not be empty".into()));
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(CoreError::InvalidData(format!(
            "price for {id} must be a non-negative number, got {unit_price}"
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_line_item_starts_at_one() {
        let item = NewLineItem::new("p1", "Shoe", "u", 10.0).into_line_item();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, "p1");
        assert_eq!(item.title, "Shoe");
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        assert!(NewLineItem::new("", "Shoe", "u", 10.0).validate().is_err());
        assert!(NewLineItem::new("   ", "Shoe", "u", 10.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        assert!(NewLineItem::new("p1", "Shoe", "u", -1.0).validate().is_err());
        assert!(NewLineItem::new("p1", "Shoe", "u", f64::NAN).validate().is_err());
        assert!(NewLineItem::new("p1", "Shoe", "u", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_free_item() {
        assert!(NewLineItem::new("p1", "Sticker", "u", 0.0).validate().is_ok());
    }

    #[test]
    fn test_line_total() {
        let mut item = NewLineItem::new("p1", "Shoe", "u", 12.5).into_line_item();
        item.quantity = 3;
        assert!((item.line_total() - 37.5).abs() < f64::EPSILON);

        item.quantity = 0;
        assert!(item.line_total().abs() < f64::EPSILON);
    }
}

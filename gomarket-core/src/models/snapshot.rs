//! Cart snapshot and its transitions.
//!
//! A [`CartSnapshot`] is the whole cart at one instant: line items in
//! insertion order, at most one per product id. Every transition returns a
//! fresh snapshot and leaves the receiver untouched, so a snapshot is never
//! observed half-applied.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::line_item::{LineItem, NewLineItem};
use crate::error::CoreError;

// ============================================================================
// Cart Snapshot
// ============================================================================

/// Ordered line items, unique by `id`.
///
/// The only ways to build one are [`CartSnapshot::new`], the transition
/// methods, and the checked `TryFrom<Vec<LineItem>>` conversion (also used by
/// deserialization), so the uniqueness invariant always holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct CartSnapshot {
    items: Vec<LineItem>,
}

impl CartSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterates over the line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Returns the entry for a product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Checks if the cart holds an entry for a product id.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of line items (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Adds a product.
    ///
    /// An existing entry with the same id gains one unit and keeps its
    /// title, image and price; the incoming fields are ignored. A new id is
    /// appended at the end with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the item fails validation.
    pub fn with_added(&self, item: NewLineItem) -> Result<Self, CoreError> {
        item.validate()?;

        if self.contains(&item.id) {
            return Ok(self.with_incremented(&item.id));
        }

        let mut items = self.items.clone();
        items.push(item.into_line_item());
        Ok(Self { items })
    }

    /// Adds one unit to the entry for `id`. Unknown ids leave the cart as is.
    pub fn with_incremented(&self, id: &str) -> Self {
        self.map_quantity(id, |q| q.saturating_add(1))
    }

    /// Removes one unit from the entry for `id`, stopping at zero.
    ///
    /// The entry stays in the cart at quantity zero. Unknown ids leave the
    /// cart as is.
    pub fn with_decremented(&self, id: &str) -> Self {
        self.map_quantity(id, |q| q.saturating_sub(1))
    }

    fn map_quantity(&self, id: &str, f: impl Fn(u32) -> u32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    LineItem {
                        quantity: f(item.quantity),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of all line totals. Display only; no tax or currency handling.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    // ========================================================================
    // Wire Format
    // ========================================================================

    /// Serializes to the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` for malformed JSON or entries that
    /// break the snapshot rules (duplicate ids, negative quantity or price).
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<Vec<LineItem>> for CartSnapshot {
    type Error = CoreError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl From<CartSnapshot> for Vec<LineItem> {
    fn from(snapshot: CartSnapshot) -> Self {
        snapshot.items
    }
}

impl<'a> IntoIterator for &'a CartSnapshot {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe() -> NewLineItem {
        NewLineItem::new("p1", "Shoe", "u", 10.0)
    }

    fn hat() -> NewLineItem {
        NewLineItem::new("p2", "Hat", "h", 5.5)
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = CartSnapshot::new().with_added(shoe()).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get("p1").unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "Shoe");
        assert_eq!(item.image_url, "u");
    }

    #[test]
    fn test_add_existing_merges_into_quantity() {
        let cart = CartSnapshot::new().with_added(shoe()).unwrap();
        let renamed = NewLineItem::new("p1", "Different", "other", 99.0);
        let cart = cart.with_added(renamed).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get("p1").unwrap();
        assert_eq!(item.quantity, 2);
        // Incoming fields are not applied to an existing entry
        assert_eq!(item.title, "Shoe");
        assert_eq!(item.image_url, "u");
        assert!((item.unit_price - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_new_appends_at_end() {
        let cart = CartSnapshot::new()
            .with_added(shoe())
            .unwrap()
            .with_added(hat())
            .unwrap()
            .with_added(shoe())
            .unwrap();

        let ids: Vec<&str> = cart.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(cart.get("p2").unwrap().quantity, 1);
    }

    #[test]
    fn test_add_rejects_invalid_item() {
        let cart = CartSnapshot::new();
        assert!(cart.with_added(NewLineItem::new("", "x", "u", 1.0)).is_err());
        assert!(cart.with_added(NewLineItem::new("p", "x", "u", -1.0)).is_err());
    }

    #[test]
    fn test_transitions_leave_receiver_untouched() {
        let before = CartSnapshot::new().with_added(shoe()).unwrap();
        let _ = before.with_incremented("p1");
        let _ = before.with_decremented("p1");
        let _ = before.with_added(hat()).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before.get("p1").unwrap().quantity, 1);
    }

    #[test]
    fn test_increment_only_touches_matching_entry() {
        let cart = CartSnapshot::new()
            .with_added(shoe())
            .unwrap()
            .with_added(hat())
            .unwrap()
            .with_incremented("p2");

        assert_eq!(cart.get("p1").unwrap().quantity, 1);
        assert_eq!(cart.get("p2").unwrap().quantity, 2);
    }

    #[test]
    fn test_decrement_clamps_at_zero_and_keeps_entry() {
        let mut cart = CartSnapshot::new().with_added(shoe()).unwrap();
        cart = cart.with_decremented("p1");
        assert_eq!(cart.get("p1").unwrap().quantity, 0);

        cart = cart.with_decremented("p1");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 0);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let cart = CartSnapshot::new().with_added(shoe()).unwrap();

        assert_eq!(cart.with_incremented("ghost"), cart);
        assert_eq!(cart.with_decremented("ghost"), cart);
        assert!(CartSnapshot::new().with_incremented("ghost").is_empty());
    }

    #[test]
    fn test_increment_saturates() {
        let item = LineItem {
            quantity: u32::MAX,
            ..shoe().into_line_item()
        };
        let cart = CartSnapshot::try_from(vec![item]).unwrap();
        assert_eq!(cart.with_incremented("p1").get("p1").unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_try_from_rejects_duplicates() {
        let result = CartSnapshot::try_from(vec![shoe().into_line_item(), shoe().into_line_item()]);
        assert!(matches!(result, Err(CoreError::DuplicateId(id)) if id == "p1"));
    }

    #[test]
    fn test_summary() {
        let cart = CartSnapshot::new()
            .with_added(shoe())
            .unwrap()
            .with_added(shoe())
            .unwrap()
            .with_added(hat())
            .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert!((cart.total_price() - 25.5).abs() < 1e-9);
    }
}

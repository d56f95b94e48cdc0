//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, format_price};
    use gomarket_core::{CartSnapshot, NewLineItem};

    fn cart() -> CartSnapshot {
        CartSnapshot::new()
            .with_added(NewLineItem::new("p1", "Shoe", "u1", 10.0))
            .unwrap()
            .with_incremented("p1")
            .with_added(NewLineItem::new("p2", "Hat", "u2", 4.5))
            .unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_cart(&CartSnapshot::new()), "Cart is empty");
    }

    #[test]
    fn test_cart_header_and_total() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_cart(&cart());

        let first = output.lines().next().unwrap();
        assert_eq!(first, "Cart (2 items, 3 units)");
        assert!(output.lines().last().unwrap().ends_with("24.50"));
    }

    #[test]
    fn test_cart_lists_items_in_order() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_cart(&cart());

        let shoe = output.find("Shoe").unwrap();
        let hat = output.find("Hat").unwrap();
        assert!(shoe < hat);
    }

    #[test]
    fn test_singular_header() {
        let formatter = TextFormatter::new(false);
        let single = CartSnapshot::new()
            .with_added(NewLineItem::new("p1", "Shoe", "u", 1.0))
            .unwrap();

        assert!(formatter.format_cart(&single).starts_with("Cart (1 item, 1 unit)"));
    }

    #[test]
    fn test_format_item_line_total() {
        let formatter = TextFormatter::new(false);
        let cart = cart();
        let line = formatter.format_item(cart.get("p1").unwrap());

        assert!(line.starts_with("  2 ×"));
        assert!(line.contains("p1"));
        assert!(line.ends_with("20.00"));
    }

    #[test]
    fn test_zero_quantity_highlighted() {
        let formatter = TextFormatter::new(true);
        let cart = cart().with_decremented("p2");
        let line = formatter.format_item(cart.get("p2").unwrap());

        assert!(line.contains("\x1b[33m"), "Zero quantity should be yellow");
    }

    #[test]
    fn test_long_title_truncated() {
        let formatter = TextFormatter::new(false);
        let cart = CartSnapshot::new()
            .with_added(NewLineItem::new("p1", "An extremely long product title here", "u", 1.0))
            .unwrap();
        let line = formatter.format_item(cart.get("p1").unwrap());

        assert!(line.contains("…"));
        assert!(!line.contains("title here"));
    }

    #[test]
    fn test_format_change() {
        let formatter = TextFormatter::new(false);
        let cart = cart();

        assert_eq!(
            formatter.format_change("Added", "p1", cart.get("p1")),
            "Added Shoe (p1): quantity 2"
        );
        assert_eq!(
            formatter.format_change("Incremented", "ghost", cart.get("ghost")),
            "ghost is not in the cart"
        );
    }

    #[test]
    fn test_no_colors_when_disabled() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_cart(&cart());
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(129.9), "129.90");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use chrono::{TimeZone, Utc};
    use gomarket_core::{CartSnapshot, NewLineItem};

    #[test]
    fn test_format_pretty_json() {
        let formatter = JsonFormatter::new(true);

        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_format_compact_json() {
        let formatter = JsonFormatter::new(false);

        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();

        assert_eq!(output, r#"{"key":"value"}"#);
    }

    #[test]
    fn test_format_cart_totals() {
        let formatter = JsonFormatter::new(false);
        let cart = CartSnapshot::new()
            .with_added(NewLineItem::new("p1", "Shoe", "u1", 10.0))
            .unwrap()
            .with_incremented("p1");

        let output = formatter.format_cart(&cart).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["itemCount"], 1);
        assert_eq!(value["totalQuantity"], 2);
        assert_eq!(value["totalPrice"], 20.0);
        assert_eq!(value["items"][0]["imageUrl"], "u1");
        assert_eq!(value["items"][0]["lineTotal"], 20.0);
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn test_format_change_found() {
        let formatter = JsonFormatter::new(false);
        let cart = CartSnapshot::new()
            .with_added(NewLineItem::new("p1", "Shoe", "u1", 10.0))
            .unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let output = formatter.format_change("add", "p1", &cart, Some(at)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["action"], "add");
        assert_eq!(value["found"], true);
        assert_eq!(value["quantity"], 1);
        assert_eq!(value["cart"]["updatedAt"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_format_change_unknown_id() {
        let formatter = JsonFormatter::new(false);

        let output = formatter
            .format_change("increment", "ghost", &CartSnapshot::new(), None)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["found"], false);
        assert!(value.get("quantity").is_none());
        assert_eq!(value["cart"]["items"], serde_json::json!([]));
    }
}

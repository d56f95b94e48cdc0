//! Text output formatting with colors.

use gomarket_core::{CartSnapshot, LineItem};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const RULE_WIDTH: usize = 48;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the whole cart with a totals footer.
    pub fn format_cart(&self, cart: &CartSnapshot) -> String {
        if cart.is_empty() {
            return self.dim("Cart is empty");
        }

        let mut lines = Vec::new();

        // Header: "Cart (2 items, 3 units)"
        lines.push(self.bold(&format!(
            "Cart ({} item{}, {} unit{})",
            cart.item_count(),
            plural(cart.item_count() as u64),
            cart.total_quantity(),
            plural(cart.total_quantity()),
        )));

        for item in cart {
            lines.push(self.format_item(item));
        }

        lines.push("─".repeat(RULE_WIDTH));
        lines.push(format!("{:<38}{:>10}", "Total", format_price(cart.total_price())));

        lines.join("\n")
    }

    /// Formats one line item: quantity, title, id and line total.
    pub fn format_item(&self, item: &LineItem) -> String {
        let qty = format!("{:>3} ×", item.quantity);
        let qty = if item.quantity == 0 {
            self.yellow(&qty)
        } else {
            qty
        };

        format!(
            "{} {:<24} {} {:>10}",
            qty,
            truncate(&item.title, 24),
            self.cyan(&format!("{:<8}", item.id)),
            format_price(item.line_total()),
        )
    }

    /// Formats the outcome of a single mutation.
    pub fn format_change(&self, action: &str, id: &str, item: Option<&LineItem>) -> String {
        match item {
            Some(item) => format!(
                "{} {} ({}): quantity {}",
                self.green(action),
                item.title,
                id,
                item.quantity
            ),
            None => self.yellow(&format!("{id} is not in the cart")),
        }
    }

    // ------------------------------------------------------------------------
    // Color helpers
    // ------------------------------------------------------------------------

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats a price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

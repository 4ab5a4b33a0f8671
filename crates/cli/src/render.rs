//! Plain-text rendering of a cart view.

use std::fmt::Write;

use ff_storefront::CartView;

/// Render the cart as aligned text lines ending in the total.
pub fn cart_text(view: &CartView) -> String {
    let mut out = String::new();

    if view.is_empty {
        let _ = writeln!(out, "Your cart is empty");
        let _ = writeln!(out, "Total: {}", view.total_display);
        return out;
    }

    let unit = if view.item_count == 1 { "item" } else { "items" };
    let _ = writeln!(out, "Cart ({} {unit})", view.item_count);

    let label = |name: &str, id: &str| {
        if name.is_empty() { id.to_string() } else { name.to_string() }
    };
    let width = view
        .lines
        .iter()
        .map(|line| label(&line.name, &line.id).chars().count())
        .max()
        .unwrap_or(0);

    for line in &view.lines {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<9} {:>14}",
            label(&line.name, &line.id),
            line.qty_label,
            line.line_total_display,
        );
    }

    let _ = writeln!(out, "Total: {}", view.total_display);
    out
}

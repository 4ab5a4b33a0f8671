//! Cart view model.

use ff_core::{Cart, CartItem, CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub qty_label: String,
    pub price_display: String,
    pub line_total_display: String,
    pub image: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: Decimal,
    /// `total` with currency symbol and grouping. Never rounded: sub-cent
    /// totals keep their extra digits, so it parses back to `total`.
    pub total_display: String,
    /// Units across all lines, shown on the cart badge.
    pub item_count: u64,
    /// True only when there are no lines; a cart of free items is not empty.
    pub is_empty: bool,
}

impl CartView {
    /// View of an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
            total_display: Price::new(Decimal::ZERO, currency).display(),
            item_count: 0,
            is_empty: true,
        }
    }
}

/// Projects a [`Cart`] into a [`CartView`]. Reads only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartPresenter {
    currency: CurrencyCode,
}

impl CartPresenter {
    /// Create a presenter formatting amounts in `currency`.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }

    /// Currency used for totals.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format an amount in this presenter's currency.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }

    /// Build the view for `cart`.
    #[must_use]
    pub fn present(&self, cart: &Cart) -> CartView {
        if cart.is_empty() {
            return CartView::empty(self.currency);
        }

        let total = cart.total();
        CartView {
            lines: cart.items.iter().map(|item| self.line(item)).collect(),
            total,
            total_display: self.format(total),
            item_count: cart.item_count(),
            is_empty: false,
        }
    }

    fn line(&self, item: &CartItem) -> CartLineView {
        CartLineView {
            id: item.id.to_string(),
            name: item.name.clone(),
            qty: item.qty,
            qty_label: format!("Qty: {}", item.qty),
            price_display: item.price_display.clone(),
            line_total_display: self.format(item.line_total()),
            image: item.image.clone(),
        }
    }
}

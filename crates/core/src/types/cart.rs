//! Cart and cart line types.
//!
//! The JSON shape of [`Cart`] is the persisted shape under the `ff_cart_v1`
//! storage key:
//!
//! ```json
//! { "items": [ { "id": "anta-whirlwind", "name": "CK ANTA WHIRLWIND",
//!                "priceValue": 4000, "priceDisplay": "₱4,000.00",
//!                "image": "assets/ANTA WHIRLWIND.png", "qty": 1 } ] }
//! ```
//!
//! The total is derived from the lines and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::{MISSING_PRICE_VALUE, Price, price_value};

/// Quantity of a freshly added line, and of stored lines whose `qty` is
/// missing, zero or not an integer.
pub const DEFAULT_QTY: u32 = 1;

const fn default_qty() -> u32 {
    DEFAULT_QTY
}

const fn missing_price_value() -> Decimal {
    MISSING_PRICE_VALUE
}

fn deserialize_qty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|qty| u32::try_from(qty).ok())
        .filter(|qty| *qty > 0)
        .unwrap_or(DEFAULT_QTY))
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Numeric unit price used for totals.
    #[serde(default = "missing_price_value", with = "price_value")]
    pub price_value: Decimal,
    /// Formatted unit price, presentation only.
    #[serde(default)]
    pub price_display: String,
    /// Product image reference.
    #[serde(default)]
    pub image: String,
    /// Number of units, always at least 1.
    #[serde(default = "default_qty", deserialize_with = "deserialize_qty")]
    pub qty: u32,
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_value.saturating_mul(Decimal::from(self.qty))
    }
}

/// A product being added to the cart.
///
/// Carries no quantity: a new line always starts at [`DEFAULT_QTY`] and an
/// existing line is incremented by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub id: ProductId,
    pub name: String,
    /// `None` when the product has no usable numeric price.
    pub price_value: Option<Decimal>,
    pub price_display: String,
    pub image: String,
}

impl AddToCart {
    /// Build a candidate from a product listing, deriving the numeric price
    /// from its display string (see [`Price::parse_display_amount`]).
    #[must_use]
    pub fn from_listing(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price_display: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        let price_display = price_display.into();
        Self {
            id: id.into(),
            name: name.into(),
            price_value: Price::parse_display_amount(&price_display),
            price_display,
            image: image.into(),
        }
    }

    fn into_item(self) -> CartItem {
        CartItem {
            id: self.id,
            name: self.name,
            price_value: self
                .price_value
                .map_or(MISSING_PRICE_VALUE, price_value::normalize),
            price_display: self.price_display,
            image: self.image,
            qty: DEFAULT_QTY,
        }
    }
}

impl From<CartItem> for AddToCart {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price_value: Some(item.price_value),
            price_display: item.price_display,
            image: item.image,
        }
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn item(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of `priceValue × qty` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for the same id (ignoring the
    /// candidate's other fields) or appends a new line with
    /// [`DEFAULT_QTY`]. Returns the line's new quantity.
    pub fn add(&mut self, candidate: AddToCart) -> u32 {
        if let Some(line) = self.items.iter_mut().find(|item| item.id == candidate.id) {
            line.qty = line.qty.saturating_add(1);
            return line.qty;
        }
        self.items.push(candidate.into_item());
        DEFAULT_QTY
    }

    /// Remove one unit of a product, dropping the line when it reaches zero.
    ///
    /// Returns the remaining quantity, or `None` if the product is not in
    /// the cart.
    pub fn decrement(&mut self, id: &ProductId) -> Option<u32> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        let line = self.items.get_mut(index)?;
        if line.qty > 1 {
            line.qty -= 1;
            Some(line.qty)
        } else {
            self.items.remove(index);
            Some(0)
        }
    }

    /// Remove a product's line entirely.
    pub fn remove(&mut self, id: &ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Fold duplicate ids into their first line, summing quantities.
    ///
    /// Carts written by this crate never contain duplicates; stored carts
    /// edited by other writers might.
    #[must_use]
    pub fn merge_duplicates(self) -> Self {
        let mut merged: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in self.items {
            match merged.iter_mut().find(|line| line.id == item.id) {
                Some(line) => line.qty = line.qty.saturating_add(item.qty),
                None => merged.push(item),
            }
        }
        Self { items: merged }
    }
}

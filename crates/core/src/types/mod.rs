//! Core types for the FF storefront.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod status;

pub use cart::{AddToCart, Cart, CartItem, DEFAULT_QTY};
pub use id::ProductId;
pub use price::{CurrencyCode, CurrencyError, MISSING_PRICE_VALUE, Price};
pub use status::CheckoutState;

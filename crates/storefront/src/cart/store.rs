//! Durable cart storage.

use ff_core::Cart;
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "ff_cart_v1";

/// Reads and writes the cart in key-value storage.
///
/// The store does not lock across handles. Two stores over the same
/// storage (two tabs) each load, modify and save independently; whichever
/// saves last wins and the other's change is lost.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create a store over `storage`.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the persisted cart.
    ///
    /// A missing key, an unreadable storage or a value that does not parse
    /// all yield an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.storage.get(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, using empty cart");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => cart.merge_duplicates(),
            Err(e) => {
                warn!(
                    error = %e,
                    raw = %raw.chars().take(200).collect::<String>(),
                    "Stored cart is unreadable, using empty cart"
                );
                Cart::new()
            }
        }
    }

    /// Persist `cart`, replacing the stored value, and hand it back.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be serialized or written.
    pub fn save(&self, cart: Cart) -> Result<Cart, StorageError> {
        let raw = serde_json::to_string(&cart)?;
        self.storage.set(CART_KEY, &raw)?;
        debug!(lines = cart.items.len(), "Cart saved");
        Ok(cart)
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(CART_KEY)?;
        debug!("Cart cleared");
        Ok(())
    }
}

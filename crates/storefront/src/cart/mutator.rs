//! Cart mutations.

use ff_core::{AddToCart, Cart, ProductId};
use tracing::{debug, instrument};

use super::store::CartStore;
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStorage, StorageError};

/// Applies load-modify-save transformations to a [`CartStore`].
#[derive(Debug)]
pub struct CartMutator<'a, S> {
    store: &'a CartStore<S>,
}

impl<'a, S: KeyValueStorage> CartMutator<'a, S> {
    /// Create a mutator over `store`.
    #[must_use]
    pub const fn new(store: &'a CartStore<S>) -> Self {
        Self { store }
    }

    /// Add one unit of a product and save.
    ///
    /// An existing line for the same id gains one unit; otherwise the
    /// candidate becomes a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self, candidate), fields(product_id = %candidate.id))]
    pub fn add_item(&self, candidate: AddToCart) -> Result<Cart, StorageError> {
        let mut cart = self.store.load();
        let id = candidate.id.clone();
        let qty = cart.add(candidate);
        debug!(qty, "Item added to cart");
        add_breadcrumb("cart", "Added item to cart", Some(&[("product_id", id.as_str())]));
        self.store.save(cart)
    }

    /// Remove one unit of a product and save. Unknown ids leave the cart
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn decrement_item(&self, id: &ProductId) -> Result<Cart, StorageError> {
        let mut cart = self.store.load();
        match cart.decrement(id) {
            Some(qty) => {
                debug!(qty, "Item quantity decremented");
                add_breadcrumb(
                    "cart",
                    "Decremented cart item",
                    Some(&[("product_id", id.as_str())]),
                );
                self.store.save(cart)
            }
            None => Ok(cart),
        }
    }

    /// Drop a product's line and save. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_item(&self, id: &ProductId) -> Result<Cart, StorageError> {
        let mut cart = self.store.load();
        if cart.remove(id).is_none() {
            return Ok(cart);
        }
        debug!("Item removed from cart");
        add_breadcrumb(
            "cart",
            "Removed item from cart",
            Some(&[("product_id", id.as_str())]),
        );
        self.store.save(cart)
    }

    /// Reset the cart to empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.clear()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CART_KEY;
    use crate::storage::MemoryStorage;

    fn candidate(id: &str, price: Option<i64>) -> AddToCart {
        AddToCart {
            id: ProductId::from(id),
            name: id.to_string(),
            price_value: price.map(Decimal::from),
            price_display: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_add_item_merges_and_persists() {
        let store = CartStore::new(MemoryStorage::new());
        let mutator = CartMutator::new(&store);

        mutator.add_item(candidate("a", Some(100))).unwrap();
        mutator.add_item(candidate("a", Some(100))).unwrap();
        let cart = mutator.add_item(candidate("b", Some(50))).unwrap();

        assert_eq!(cart, store.load());
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].qty, 2);
        assert_eq!(cart.items[1].qty, 1);
        assert_eq!(cart.total(), Decimal::from(250));
    }

    #[test]
    fn test_add_item_without_price_is_zero() {
        let store = CartStore::new(MemoryStorage::new());
        let cart = CartMutator::new(&store)
            .add_item(candidate("a", None))
            .unwrap();
        assert_eq!(cart.items[0].price_value, Decimal::ZERO);
    }

    #[test]
    fn test_add_item_recovers_from_corrupted_storage() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "garbage").unwrap();
        let store = CartStore::new(storage);

        let cart = CartMutator::new(&store)
            .add_item(candidate("a", Some(1)))
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(store.load(), cart);
    }

    #[test]
    fn test_decrement_and_remove() {
        let store = CartStore::new(MemoryStorage::new());
        let mutator = CartMutator::new(&store);
        mutator.add_item(candidate("a", Some(10))).unwrap();
        mutator.add_item(candidate("a", Some(10))).unwrap();
        mutator.add_item(candidate("b", Some(5))).unwrap();

        let cart = mutator.decrement_item(&ProductId::from("a")).unwrap();
        assert_eq!(cart.items[0].qty, 1);
        let cart = mutator.decrement_item(&ProductId::from("a")).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id.as_str(), "b");

        let cart = mutator.remove_item(&ProductId::from("b")).unwrap();
        assert!(cart.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let storage = MemoryStorage::new();
        let store = CartStore::new(storage.clone());
        let mutator = CartMutator::new(&store);

        let cart = mutator.decrement_item(&ProductId::from("nope")).unwrap();
        assert!(cart.is_empty());
        let cart = mutator.remove_item(&ProductId::from("nope")).unwrap();
        assert!(cart.is_empty());
        // Nothing was written for a no-op.
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clear() {
        let store = CartStore::new(MemoryStorage::new());
        let mutator = CartMutator::new(&store);
        mutator.add_item(candidate("a", Some(10))).unwrap();

        mutator.clear().unwrap();
        assert!(store.load().is_empty());
    }
}

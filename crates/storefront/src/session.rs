//! Cart session shared across UI event handlers.

use std::sync::Arc;

use ff_core::{AddToCart, Cart, CheckoutState, CurrencyCode, ProductId};
use tracing::{instrument, warn};

use crate::cart::{CartMutator, CartPresenter, CartStore, CartView};
use crate::checkout::{Checkout, CheckoutOutcome};
use crate::config::StorefrontConfig;
use crate::credentials::CredentialStore;
use crate::gateway::CartGateway;
use crate::storage::{KeyValueStorage, StorageError};

/// Session behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Currency used to format totals.
    pub currency: CurrencyCode,
    /// Push the cart to the backend after every change.
    pub sync_cart: bool,
}

impl From<&StorefrontConfig> for SessionOptions {
    fn from(config: &StorefrontConfig) -> Self {
        Self {
            currency: config.currency,
            sync_cart: config.sync_cart,
        }
    }
}

/// Cart state and collaborators for one client.
///
/// This struct is cheaply cloneable via `Arc`; clones share the checkout
/// guard, so a checkout started from one handler blocks a second one
/// started from another.
pub struct CartSession<S, G> {
    inner: Arc<CartSessionInner<S, G>>,
}

struct CartSessionInner<S, G> {
    store: CartStore<S>,
    credentials: CredentialStore<S>,
    presenter: CartPresenter,
    gateway: G,
    checkout: Checkout,
    sync_cart: bool,
}

impl<S, G> Clone for CartSession<S, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, G> CartSession<S, G>
where
    S: KeyValueStorage + Clone + Send + Sync,
    G: CartGateway,
{
    /// Create a session over `storage` talking to `gateway`.
    #[must_use]
    pub fn new(storage: S, gateway: G, options: SessionOptions) -> Self {
        Self {
            inner: Arc::new(CartSessionInner {
                store: CartStore::new(storage.clone()),
                credentials: CredentialStore::new(storage),
                presenter: CartPresenter::new(options.currency),
                gateway,
                checkout: Checkout::new(),
                sync_cart: options.sync_cart,
            }),
        }
    }

    /// Current stored cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.store.load()
    }

    /// View of the current stored cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        self.inner.presenter.present(&self.cart())
    }

    /// Presenter used for views and notices.
    #[must_use]
    pub fn presenter(&self) -> &CartPresenter {
        &self.inner.presenter
    }

    /// Stored bearer credential.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.inner.credentials
    }

    /// Checkout progress.
    #[must_use]
    pub fn checkout_state(&self) -> CheckoutState {
        self.inner.checkout.state()
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self, candidate), fields(product_id = %candidate.id))]
    pub async fn add_to_cart(&self, candidate: AddToCart) -> Result<CartView, StorageError> {
        let cart = self.mutator().add_item(candidate)?;
        Ok(self.after_change(cart).await)
    }

    /// Remove one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<CartView, StorageError> {
        let cart = self.mutator().decrement_item(id)?;
        Ok(self.after_change(cart).await)
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<CartView, StorageError> {
        let cart = self.mutator().remove_item(id)?;
        Ok(self.after_change(cart).await)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<CartView, StorageError> {
        self.mutator().clear()?;
        Ok(self.after_change(Cart::new()).await)
    }

    /// Submit the cart as an order with the stored credential.
    pub async fn checkout(&self) -> CheckoutOutcome {
        let inner = &*self.inner;
        inner
            .checkout
            .run(&inner.store, &inner.gateway, inner.credentials.bearer_token())
            .await
    }

    fn mutator(&self) -> CartMutator<'_, S> {
        CartMutator::new(&self.inner.store)
    }

    /// Best-effort sync, then re-render.
    async fn after_change(&self, cart: Cart) -> CartView {
        if self.inner.sync_cart
            && let Err(e) = self.inner.gateway.sync_cart(&cart).await
        {
            warn!(error = %e, "Cart sync failed, keeping local cart");
        }
        self.inner.presenter.present(&cart)
    }
}

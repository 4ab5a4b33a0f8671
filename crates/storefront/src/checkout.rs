//! Checkout: submit the cart as an order and clear it on success.
//!
//! `Idle -> Submitting -> {Cleared | Failed}`. An empty cart is rejected
//! before any network call. While one submission is in flight, further
//! attempts are turned away instead of posting a duplicate order. Dropping
//! an in-flight checkout (the caller navigated away) resets to `Idle` and
//! leaves the cart as it was.

use std::sync::{Mutex, PoisonError};

use ff_core::{CheckoutState, CurrencyCode, Price};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::cart::{CartMutator, CartStore};
use crate::error::{add_breadcrumb, report_error};
use crate::gateway::{CartGateway, GatewayError, OrderRequest};
use crate::storage::KeyValueStorage;

/// Result of one checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Order accepted and the cart cleared.
    Placed { total: Decimal, item_count: u64 },
    /// Nothing to order; no request was made.
    EmptyCart,
    /// Another checkout is still being submitted; no request was made.
    InProgress,
    /// Order rejected or backend unreachable; the cart is unchanged.
    Failed(GatewayError),
}

impl CheckoutOutcome {
    /// Whether the order was placed.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }

    /// User-facing notice for this outcome.
    #[must_use]
    pub fn notice(&self, currency: CurrencyCode) -> String {
        match self {
            Self::Placed { total, .. } => {
                format!("Order placed. Total: {}", Price::new(*total, currency).display())
            }
            Self::EmptyCart => "Cart empty".to_string(),
            Self::InProgress => "Checkout already in progress".to_string(),
            Self::Failed(GatewayError::Status { status, .. }) => {
                format!("Order endpoint returned an error (HTTP {status}). Your cart was kept.")
            }
            Self::Failed(_) => {
                "Checkout failed: no backend available. Your cart was kept.".to_string()
            }
        }
    }
}

/// Checkout state holder and re-entrancy guard.
#[derive(Debug, Default)]
pub struct Checkout {
    state: Mutex<CheckoutState>,
}

impl Checkout {
    /// Create an idle checkout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, state: CheckoutState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Submit the stored cart as an order.
    ///
    /// On success the stored cart is cleared. On failure it is left as it
    /// was so the shopper can retry.
    #[instrument(skip_all)]
    pub async fn run<S, G>(
        &self,
        store: &CartStore<S>,
        gateway: &G,
        credential: Option<SecretString>,
    ) -> CheckoutOutcome
    where
        S: KeyValueStorage + Sync,
        G: CartGateway,
    {
        let (guard, order) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.can_begin() {
                info!("Checkout already in progress");
                return CheckoutOutcome::InProgress;
            }

            let cart = store.load();
            if cart.is_empty() {
                *state = CheckoutState::Idle;
                info!("Checkout rejected: cart is empty");
                return CheckoutOutcome::EmptyCart;
            }

            *state = CheckoutState::Submitting;
            (SubmittingGuard::new(self), OrderRequest::from_cart(&cart))
        };

        let item_count: u64 = order.items.iter().map(|item| u64::from(item.qty)).sum();
        add_breadcrumb("checkout", "Submitting order", None);

        match gateway.submit_order(&order, credential.as_ref()).await {
            Ok(()) => {
                if let Err(e) = CartMutator::new(store).clear() {
                    report_error(&e, "Order placed but the cart could not be cleared");
                }
                guard.finish(CheckoutState::Cleared);
                info!(total = %order.total, item_count, "Order placed");
                CheckoutOutcome::Placed {
                    total: order.total,
                    item_count,
                }
            }
            Err(e) => {
                guard.finish(CheckoutState::Failed);
                if e.status().is_some() {
                    report_error(&e, "Order submission rejected");
                } else {
                    warn!(error = %e, "Order submission failed");
                }
                CheckoutOutcome::Failed(e)
            }
        }
    }
}

/// Holds `Submitting`; resets to `Idle` if dropped before `finish`.
struct SubmittingGuard<'a> {
    checkout: &'a Checkout,
    finished: bool,
}

impl<'a> SubmittingGuard<'a> {
    const fn new(checkout: &'a Checkout) -> Self {
        Self {
            checkout,
            finished: false,
        }
    }

    fn finish(mut self, state: CheckoutState) {
        self.checkout.set(state);
        self.finished = true;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.checkout.set(CheckoutState::Idle);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::future::Future;
    use std::pin::pin;
    use std::sync::Arc;
    use std::task::{Context, Poll, Waker};

    use ff_core::{AddToCart, Cart, ProductId};
    use tokio::sync::Notify;

    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::storage::MemoryStorage;

    fn filled_store() -> CartStore<MemoryStorage> {
        let store = CartStore::new(MemoryStorage::new());
        let mutator = CartMutator::new(&store);
        for (id, price) in [("a", 100), ("a", 100), ("b", 50)] {
            mutator
                .add_item(AddToCart {
                    id: ProductId::from(id),
                    name: id.to_string(),
                    price_value: Some(Decimal::from(price)),
                    price_display: String::new(),
                    image: String::new(),
                })
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let store = filled_store();
        let gateway = FakeGateway::default();
        let checkout = Checkout::new();

        let outcome = checkout
            .run(&store, &gateway, Some(SecretString::from("tok")))
            .await;

        assert!(matches!(
            outcome,
            CheckoutOutcome::Placed { total, item_count: 3 } if total == Decimal::from(250)
        ));
        assert_eq!(store.load(), Cart::new());
        assert_eq!(checkout.state(), CheckoutState::Cleared);

        let orders = gateway.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0.total, Decimal::from(250));
        assert_eq!(orders[0].1.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_failure_preserves_cart() {
        let store = filled_store();
        let before = store.load();
        let gateway = FakeGateway::failing_orders(500);
        let checkout = Checkout::new();

        let outcome = checkout.run(&store, &gateway, None).await;

        assert!(matches!(outcome, CheckoutOutcome::Failed(_)));
        assert_eq!(store.load(), before);
        assert_eq!(checkout.state(), CheckoutState::Failed);
        assert_eq!(
            outcome.notice(CurrencyCode::PHP),
            "Order endpoint returned an error (HTTP 500). Your cart was kept."
        );
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let store = filled_store();
        let gateway = FakeGateway::failing_orders(503);
        let checkout = Checkout::new();

        assert!(!checkout.run(&store, &gateway, None).await.is_placed());
        assert!(checkout.run(&store, &gateway, None).await.is_placed());
        assert_eq!(gateway.order_count(), 2);
        assert!(store.load().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_without_request() {
        let store = CartStore::new(MemoryStorage::new());
        let gateway = FakeGateway::default();
        let checkout = Checkout::new();

        let outcome = checkout.run(&store, &gateway, None).await;

        assert!(matches!(outcome, CheckoutOutcome::EmptyCart));
        assert_eq!(outcome.notice(CurrencyCode::PHP), "Cart empty");
        assert_eq!(gateway.order_count(), 0);
        assert_eq!(checkout.state(), CheckoutState::Idle);
    }

    /// Gateway whose order call waits until released.
    #[derive(Default)]
    struct BlockingGateway {
        release: Arc<Notify>,
        calls: Mutex<usize>,
    }

    impl CartGateway for BlockingGateway {
        async fn sync_cart(&self, _cart: &Cart) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn submit_order(
            &self,
            _order: &OrderRequest,
            _credential: Option<&SecretString>,
        ) -> Result<(), GatewayError> {
            *self.calls.lock().unwrap() += 1;
            self.release.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_checkout_while_submitting_is_turned_away() {
        let store = filled_store();
        let gateway = BlockingGateway::default();
        let checkout = Checkout::new();

        let mut first = pin!(checkout.run(&store, &gateway, None));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(first.as_mut().poll(&mut cx).is_pending());
        assert_eq!(checkout.state(), CheckoutState::Submitting);

        let second = checkout.run(&store, &gateway, None).await;
        assert!(matches!(second, CheckoutOutcome::InProgress));
        assert_eq!(*gateway.calls.lock().unwrap(), 1);

        gateway.release.notify_one();
        let first = first.await;
        assert!(first.is_placed());
        assert_eq!(checkout.state(), CheckoutState::Cleared);
    }

    #[tokio::test]
    async fn test_dropped_checkout_resets_to_idle() {
        let store = filled_store();
        let before = store.load();
        let gateway = BlockingGateway::default();
        let checkout = Checkout::new();

        {
            let mut pending = pin!(checkout.run(&store, &gateway, None));
            let mut cx = Context::from_waker(Waker::noop());
            assert!(matches!(pending.as_mut().poll(&mut cx), Poll::Pending));
            assert_eq!(checkout.state(), CheckoutState::Submitting);
        }

        assert_eq!(checkout.state(), CheckoutState::Idle);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_notices() {
        let placed = CheckoutOutcome::Placed {
            total: Decimal::from(250),
            item_count: 3,
        };
        assert_eq!(placed.notice(CurrencyCode::PHP), "Order placed. Total: ₱250.00");
        assert_eq!(
            CheckoutOutcome::InProgress.notice(CurrencyCode::PHP),
            "Checkout already in progress"
        );
    }
}

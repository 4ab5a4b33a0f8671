//! Backend cart and order endpoints.
//!
//! # Endpoints
//!
//! - `POST /api/cart` - best-effort snapshot of the local cart
//! - `POST /api/orders` - order submission, `{ items, total }` with an
//!   optional bearer credential
//!
//! Both calls are fire-and-report: no retries, and a 2xx status is the only
//! success signal (response bodies are not read on success).

mod http;

pub use http::HttpGateway;

use std::future::Future;

use ff_core::price::price_value;
use ff_core::{Cart, CartItem};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the cart sync endpoint.
pub const CART_PATH: &str = "/api/cart";

/// Path of the order submission endpoint.
pub const ORDERS_PATH: &str = "/api/orders";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        /// First 200 characters of the response body.
        body: String,
    },

    /// Endpoint URL could not be built from the configured base URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Order submission payload: a snapshot of the cart and its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<CartItem>,
    #[serde(with = "price_value")]
    pub total: Decimal,
}

impl OrderRequest {
    /// Snapshot `cart`; later cart changes do not affect the request.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items.clone(),
            total: cart.total(),
        }
    }
}

/// Outbound calls made by the cart subsystem.
pub trait CartGateway: Send + Sync {
    /// Push the current cart to the backend.
    fn sync_cart(&self, cart: &Cart) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Submit an order.
    fn submit_order(
        &self,
        order: &OrderRequest,
        credential: Option<&SecretString>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fake {
    //! Scripted gateway for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use secrecy::ExposeSecret;

    use super::*;

    /// Records calls and answers with queued results (`Ok` when the queue is empty).
    #[derive(Debug, Default)]
    pub struct FakeGateway {
        pub synced: Mutex<Vec<Cart>>,
        pub orders: Mutex<Vec<(OrderRequest, Option<String>)>>,
        pub sync_results: Mutex<VecDeque<Result<(), GatewayError>>>,
        pub order_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    }

    impl FakeGateway {
        pub fn failing_orders(status: u16) -> Self {
            let gateway = Self::default();
            gateway.fail_next_order(status);
            gateway
        }

        pub fn fail_next_order(&self, status: u16) {
            self.order_results.lock().unwrap().push_back(Err(status_error(status)));
        }

        pub fn fail_next_sync(&self, status: u16) {
            self.sync_results.lock().unwrap().push_back(Err(status_error(status)));
        }

        pub fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }
    }

    pub fn status_error(status: u16) -> GatewayError {
        GatewayError::Status {
            endpoint: ORDERS_PATH,
            status,
            body: String::new(),
        }
    }

    impl CartGateway for FakeGateway {
        async fn sync_cart(&self, cart: &Cart) -> Result<(), GatewayError> {
            self.synced.lock().unwrap().push(cart.clone());
            self.sync_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }

        async fn submit_order(
            &self,
            order: &OrderRequest,
            credential: Option<&SecretString>,
        ) -> Result<(), GatewayError> {
            self.orders.lock().unwrap().push((
                order.clone(),
                credential.map(|c| c.expose_secret().to_string()),
            ));
            self.order_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ff_core::{AddToCart, ProductId};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_request_payload_shape() {
        let mut cart = Cart::new();
        for (id, price) in [("a", 100), ("a", 100), ("b", 50)] {
            cart.add(AddToCart {
                id: ProductId::from(id),
                name: id.to_string(),
                price_value: Some(Decimal::from(price)),
                price_display: String::new(),
                image: String::new(),
            });
        }

        let payload = serde_json::to_value(OrderRequest::from_cart(&cart)).unwrap();
        assert_eq!(payload["total"], json!(250));
        assert_eq!(payload["items"].as_array().unwrap().len(), 2);
        assert_eq!(payload["items"][0]["qty"], json!(2));
    }

    #[test]
    fn test_order_request_is_a_snapshot() {
        let mut cart = Cart::new();
        cart.add(AddToCart::from_listing("a", "A", "₱10.00", ""));
        let order = OrderRequest::from_cart(&cart);

        cart.add(AddToCart::from_listing("b", "B", "₱20.00", ""));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Decimal::from(10));
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Status {
            endpoint: ORDERS_PATH,
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "/api/orders returned HTTP 502");
        assert_eq!(err.status(), Some(502));
    }
}

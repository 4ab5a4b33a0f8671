//! `reqwest` implementation of [`CartGateway`].

use std::sync::Arc;

use ff_core::Cart;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::{CART_PATH, CartGateway, GatewayError, ORDERS_PATH, OrderRequest};
use crate::config::ApiConfig;

/// HTTP client for the storefront backend.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    cart_endpoint: Url,
    orders_endpoint: Url,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("cart_endpoint", &self.inner.cart_endpoint.as_str())
            .field("orders_endpoint", &self.inner.orders_endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Create a gateway for the backend at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the HTTP client cannot be built or the
    /// endpoint URLs cannot be derived from the base URL.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner {
                client,
                cart_endpoint: config.base_url.join(CART_PATH)?,
                orders_endpoint: config.base_url.join(ORDERS_PATH)?,
            }),
        })
    }

    /// POST a JSON body and map the status to a result.
    async fn post_json<T: Serialize + Sync + ?Sized>(
        &self,
        endpoint: &Url,
        label: &'static str,
        body: &T,
        credential: Option<&SecretString>,
    ) -> Result<(), GatewayError> {
        let mut request = self
            .inner
            .client
            .post(endpoint.clone())
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = credential {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(status = %status, endpoint = label, "Backend accepted request");
            return Ok(());
        }

        // Body is diagnostic only; a failure to read it is not worth reporting.
        let body = response.text().await.unwrap_or_default();
        debug!(
            status = %status,
            endpoint = label,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );
        Err(GatewayError::Status {
            endpoint: label,
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

impl CartGateway for HttpGateway {
    #[instrument(skip(self, cart), fields(lines = cart.items.len()))]
    async fn sync_cart(&self, cart: &Cart) -> Result<(), GatewayError> {
        self.post_json(&self.inner.cart_endpoint, CART_PATH, cart, None)
            .await
    }

    #[instrument(
        skip(self, order, credential),
        fields(lines = order.items.len(), total = %order.total, authenticated = credential.is_some())
    )]
    async fn submit_order(
        &self,
        order: &OrderRequest,
        credential: Option<&SecretString>,
    ) -> Result<(), GatewayError> {
        self.post_json(&self.inner.orders_endpoint, ORDERS_PATH, order, credential)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(base: &str) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(base).unwrap(),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoints_join_base_url() {
        let gateway = HttpGateway::new(&config("http://127.0.0.1:3000")).unwrap();
        assert_eq!(
            gateway.inner.orders_endpoint.as_str(),
            "http://127.0.0.1:3000/api/orders"
        );
        assert_eq!(
            gateway.inner.cart_endpoint.as_str(),
            "http://127.0.0.1:3000/api/cart"
        );
    }

    #[test]
    fn test_endpoints_replace_base_path() {
        let gateway = HttpGateway::new(&config("https://shop.example.com/store/")).unwrap();
        assert_eq!(
            gateway.inner.orders_endpoint.as_str(),
            "https://shop.example.com/api/orders"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let gateway = HttpGateway::new(&config(&format!("http://127.0.0.1:{port}"))).unwrap();
        let err = gateway.sync_cart(&Cart::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
        assert_eq!(err.status(), None);
    }
}

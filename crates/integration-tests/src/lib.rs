//! Integration tests for the FF storefront cart.
//!
//! The tests under `tests/` drive the real `HttpGateway` against
//! [`FakeApi`], an in-process backend serving `POST /api/cart` and
//! `POST /api/orders` on an ephemeral localhost port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ff-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use ff_storefront::ApiConfig;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// One request received by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Parsed JSON body.
    pub body: Value,
    /// Raw `Authorization` header, if sent.
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    carts: Arc<Mutex<Vec<RecordedRequest>>>,
    orders: Arc<Mutex<Vec<RecordedRequest>>>,
    cart_status: Arc<AtomicU16>,
    order_status: Arc<AtomicU16>,
}

impl FakeState {
    fn new() -> Self {
        Self {
            carts: Arc::default(),
            orders: Arc::default(),
            cart_status: Arc::new(AtomicU16::new(StatusCode::OK.as_u16())),
            order_status: Arc::new(AtomicU16::new(StatusCode::CREATED.as_u16())),
        }
    }
}

/// In-process storefront backend recording what it receives.
///
/// Answers `200` to cart syncs and `201` to orders until told otherwise.
/// The server task is aborted when the value is dropped.
pub struct FakeApi {
    base_url: Url,
    state: FakeState,
    server: JoinHandle<()>,
}

impl FakeApi {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = FakeState::new();
        let app = Router::new()
            .route("/api/cart", post(record_cart))
            .route("/api/orders", post(record_order))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = url_for(listener.local_addr()?)?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake API server stopped");
            }
        });

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// Gateway configuration pointing at this server.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Answer subsequent cart syncs with `status`.
    pub fn respond_to_cart_with(&self, status: u16) {
        self.state.cart_status.store(status, Ordering::SeqCst);
    }

    /// Answer subsequent orders with `status`.
    pub fn respond_to_orders_with(&self, status: u16) {
        self.state.order_status.store(status, Ordering::SeqCst);
    }

    /// Cart syncs received so far.
    #[must_use]
    pub fn carts(&self) -> Vec<RecordedRequest> {
        recorded(&self.state.carts)
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<RecordedRequest> {
        recorded(&self.state.orders)
    }

    /// Whether the server task is still running.
    ///
    /// The task only finishes early when `axum::serve` fails; the error is
    /// logged before it exits.
    #[must_use]
    pub fn is_serving(&self) -> bool {
        !self.server.is_finished()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Gateway configuration for a localhost port with nothing listening.
///
/// # Errors
///
/// Returns an I/O error if a probe port cannot be bound.
pub fn unreachable_api() -> std::io::Result<ApiConfig> {
    let probe = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = probe.local_addr()?;
    drop(probe);

    Ok(ApiConfig {
        base_url: url_for(addr)?,
        request_timeout: Duration::from_secs(2),
    })
}

fn url_for(addr: SocketAddr) -> std::io::Result<Url> {
    Url::parse(&format!("http://{addr}"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

// =============================================================================
// Handlers
// =============================================================================

async fn record_cart(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    record(&state.carts, &headers, body);
    status_from(&state.cart_status)
}

async fn record_order(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    record(&state.orders, &headers, body);
    status_from(&state.order_status)
}

fn record(log: &Mutex<Vec<RecordedRequest>>, headers: &HeaderMap, body: Value) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            body,
            authorization,
        });
}

fn recorded(log: &Mutex<Vec<RecordedRequest>>) -> Vec<RecordedRequest> {
    log.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn status_from(status: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

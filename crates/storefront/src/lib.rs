//! FF Storefront cart library.
//!
//! Client-side cart for the storefront page: persistence in a key-value
//! store, pure mutations, rendering into display values, best-effort cart
//! sync and order checkout against the backend. [`CartSession`] ties these
//! together for a host (the CLI, or a UI event loop).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod session;
pub mod storage;

pub use cart::{CartMutator, CartPresenter, CartStore, CartView};
pub use checkout::{Checkout, CheckoutOutcome};
pub use config::{ApiConfig, ConfigError, StorefrontConfig};
pub use credentials::CredentialStore;
pub use error::{AppError, Result};
pub use gateway::{CartGateway, GatewayError, HttpGateway, OrderRequest};
pub use session::{CartSession, SessionOptions};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

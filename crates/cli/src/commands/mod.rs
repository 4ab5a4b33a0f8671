//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod token;

use ff_storefront::{CartSession, FileStorage, HttpGateway};

/// Session type the CLI drives.
pub type Session = CartSession<FileStorage, HttpGateway>;

//! FF Core - Shared cart types.
//!
//! This crate provides the data model used across all FF storefront components:
//! - `storefront` - Cart store, presenter, checkout and the backend gateway
//! - `cli` - Command-line host that drives a cart against a storage directory
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transformations - no I/O,
//! no storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, cart lines and checkout status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

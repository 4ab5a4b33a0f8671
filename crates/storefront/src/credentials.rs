//! Bearer credential persisted next to the cart.
//!
//! The token is written by the login flow (not part of this crate) and read
//! when submitting orders. It is held as a `SecretString` and never logged.

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "ff_token";

/// Reads and writes the stored bearer token.
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> CredentialStore<S> {
    /// Create a credential store over `storage`.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The stored token, if any. Empty values count as absent.
    #[must_use]
    pub fn bearer_token(&self) -> Option<SecretString> {
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                None
            }
        }
    }

    /// Store a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn set_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token.expose_secret())
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)
    }
}

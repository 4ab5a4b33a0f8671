//! Bearer token commands.

use ff_storefront::Result;
use secrecy::SecretString;

use super::Session;

/// Store a bearer token for checkout.
pub fn set(session: &Session, token: String) -> Result<()> {
    session.credentials().set_token(&SecretString::from(token))?;
    tracing::info!("Bearer token stored");
    Ok(())
}

/// Forget the stored bearer token.
pub fn clear(session: &Session) -> Result<()> {
    session.credentials().clear()?;
    tracing::info!("Bearer token cleared");
    Ok(())
}

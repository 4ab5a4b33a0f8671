//! Cart commands.
//!
//! Every mutation prints the re-rendered cart, the same view a page would
//! redraw after the change.

use ff_core::{AddToCart, ProductId};
use ff_storefront::{AppError, CartView, Result};

use super::Session;
use crate::render;

/// Add one unit of a product.
pub async fn add(session: &Session, candidate: AddToCart) -> Result<()> {
    tracing::info!(product_id = %candidate.id, "Adding to cart");
    let view = session.add_to_cart(candidate).await?;
    print_view(&view);
    Ok(())
}

/// Remove one unit of a product.
pub async fn decrement(session: &Session, id: &ProductId) -> Result<()> {
    ensure_in_cart(session, id)?;
    let view = session.decrement(id).await?;
    print_view(&view);
    Ok(())
}

/// Remove a product's line.
pub async fn remove(session: &Session, id: &ProductId) -> Result<()> {
    ensure_in_cart(session, id)?;
    let view = session.remove(id).await?;
    print_view(&view);
    Ok(())
}

/// Empty the cart.
pub async fn clear(session: &Session) -> Result<()> {
    let view = session.clear().await?;
    print_view(&view);
    Ok(())
}

/// Print the cart, as text or JSON.
pub fn show(session: &Session, json: bool) -> Result<()> {
    let view = session.view();
    if json {
        let body = serde_json::to_string_pretty(&view)?;
        #[allow(clippy::print_stdout)]
        {
            println!("{body}");
        }
    } else {
        print_view(&view);
    }
    Ok(())
}

fn ensure_in_cart(session: &Session, id: &ProductId) -> Result<()> {
    if session.cart().item(id).is_none() {
        return Err(AppError::BadRequest(format!("{id} is not in the cart")));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_view(view: &CartView) {
    print!("{}", render::cart_text(view));
}

//! Local cart subsystem.
//!
//! - [`CartStore`] - persists the cart under [`CART_KEY`]
//! - [`CartMutator`] - add/merge, decrement, remove and clear
//! - [`CartPresenter`] - pure projection into a [`CartView`]
//!
//! Mutations return the saved cart; re-running the presenter is the
//! caller's job.

mod mutator;
mod presenter;
mod store;

pub use mutator::CartMutator;
pub use presenter::{CartLineView, CartPresenter, CartView};
pub use store::{CART_KEY, CartStore};

//! Cart documents and the stale-cart janitor.

pub mod cart;
pub mod janitor;

pub use cart::{Cart, CartItem};
pub use janitor::CartJanitor;

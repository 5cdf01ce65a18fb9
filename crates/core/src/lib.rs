//! `vidatea-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no IO).

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use id::{CartId, DocumentId, OrderId, ProductId, SessionId, UserId};

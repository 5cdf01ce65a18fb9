//! Document-store seam: transactional read → conditional write over
//! schemaless JSON documents, plus the non-transactional append and
//! batched-delete primitives the best-effort writers use.
//!
//! Handles are passed explicitly into every service; there is no
//! process-global store singleton.

pub mod collections;
pub mod document;
pub mod guard;
pub mod memory;
pub mod retry;
pub mod transaction;

pub use document::{Document, DocumentStore, ReadStamp, WriteOp};
pub use guard::{FieldShape, WriteGuard};
pub use memory::InMemoryStore;
pub use retry::RetryPolicy;
pub use transaction::{Transaction, run_transaction};

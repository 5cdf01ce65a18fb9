//! Order-side services: the per-year sequential order-number allocator and
//! the append-only order event log.

pub mod event;
pub mod number;

pub use event::{OrderEvent, OrderEventMetadata, OrderEventType, record_order_event};
pub use number::{OrderNumber, OrderNumberAllocator};

//! Top-level collection names and well-known document keys.

pub const PRODUCTS: &str = "products";
pub const INVENTORY_LOGS: &str = "inventoryLogs";
pub const COUNTERS: &str = "counters";
pub const ORDER_EVENTS: &str = "orderEvents";
pub const ANALYTICS: &str = "analytics";
pub const CARTS: &str = "carts";

/// Singleton counter document inside [`COUNTERS`].
pub const ORDER_NUMBER_COUNTER: &str = "orderNumber";

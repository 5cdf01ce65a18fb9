//! Inventory ledger: stock adjustment with a zero floor, paired with an
//! immutable audit record, written in one transaction.

pub mod ledger;

pub use ledger::{AdjustInventory, ChangeType, InventoryLedger, InventoryLog};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use vidatea_core::{Clock, CoreError, CoreResult, DocumentId, ProductId, UserId};
use vidatea_store::{DocumentStore, FieldShape, WriteGuard, collections, run_transaction};

/// Why a product's stock level changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Order,
    Restock,
    Adjustment,
}

/// Command: adjust one product's stock.
///
/// `delta` may be negative (orders) or positive (restocks); `reference_id`
/// ties the change to the document that caused it (an order, a manual
/// adjustment record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustInventory {
    pub product_id: ProductId,
    pub delta: i64,
    pub change_type: ChangeType,
    pub reference_id: String,
    pub performed_by: UserId,
    pub note: Option<String>,
}

/// Immutable audit record, exactly one per successful adjustment.
///
/// Never mutated or deleted; `note` serializes as an explicit null when
/// absent, matching the stored shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLog {
    pub product_id: ProductId,
    pub change_type: ChangeType,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_amount: i64,
    pub reference_id: String,
    pub note: Option<String>,
    pub performed_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// The inventory ledger.
///
/// `adjust` runs a single store transaction: read the product, floor the new
/// quantity at zero, then write the new stock level and append the audit
/// record together or not at all. Contention surfaces as
/// [`CoreError::Conflict`]; the ledger itself never retries.
#[derive(Debug)]
pub struct InventoryLedger<S, C> {
    store: S,
    clock: C,
    guard: WriteGuard,
}

impl<S, C> InventoryLedger<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            guard: WriteGuard::new().require("inventory", FieldShape::NonNegativeInt),
        }
    }

    /// Replace the write guard (e.g. to add a minimum update interval).
    pub fn with_guard(mut self, guard: WriteGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Atomically adjust stock and append the audit record.
    ///
    /// Fails with [`CoreError::NotFound`] if the product is absent and
    /// [`CoreError::InsufficientInventory`] if the adjustment would drive
    /// stock negative; neither leaves any side effect.
    pub fn adjust(&self, cmd: AdjustInventory) -> CoreResult<InventoryLog> {
        let now = self.clock.now();
        // Minted up front, like an auto-ID document reference.
        let log_id = DocumentId::generate();

        let log = run_transaction(&self.store, now, |tx| {
            let product = tx
                .get(collections::PRODUCTS, cmd.product_id.as_str())?
                .ok_or(CoreError::NotFound)?;

            let current = product
                .data
                .get("inventory")
                .and_then(JsonValue::as_i64)
                .unwrap_or(0);
            let new_quantity = current + cmd.delta;

            if new_quantity < 0 {
                return Err(CoreError::insufficient_inventory(current, -cmd.delta));
            }

            let mut fields = serde_json::Map::new();
            fields.insert("inventory".to_string(), JsonValue::from(new_quantity));
            self.guard
                .check(Some(&product), &JsonValue::Object(fields.clone()), now)?;
            tx.update(collections::PRODUCTS, cmd.product_id.as_str(), fields);

            let log = InventoryLog {
                product_id: cmd.product_id.clone(),
                change_type: cmd.change_type,
                previous_quantity: current,
                new_quantity,
                change_amount: cmd.delta,
                reference_id: cmd.reference_id.clone(),
                note: cmd.note.clone(),
                performed_by: cmd.performed_by.clone(),
                created_at: now,
            };
            tx.set(collections::INVENTORY_LOGS, log_id.as_str(), &log)?;

            Ok(log)
        })?;

        tracing::debug!(
            product_id = %log.product_id,
            delta = log.change_amount,
            new_quantity = log.new_quantity,
            "inventory adjusted"
        );

        Ok(log)
    }
}

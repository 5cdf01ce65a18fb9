use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidatea_core::{CoreError, CoreResult, DocumentId, OrderId, UserId};
use vidatea_store::{DocumentStore, collections};

/// Order lifecycle transition kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventType {
    StatusChange,
    ShipmentUpdate,
    RefundProcessed,
}

/// Optional event detail; absent fields are omitted from the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    /// Smallest currency unit (cents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<u64>,
}

/// Append-only record of one order lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub event_type: OrderEventType,
    #[serde(flatten)]
    pub metadata: OrderEventMetadata,
    pub performed_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Fire-and-forget append into `orderEvents`.
///
/// Not transactional: no uniqueness or ordering guarantee beyond the stored
/// timestamp. A failure surfaces as [`CoreError::WriteFailure`] with nothing
/// to roll back.
pub fn record_order_event<S: DocumentStore>(
    store: &S,
    now: DateTime<Utc>,
    order_id: OrderId,
    event_type: OrderEventType,
    metadata: OrderEventMetadata,
    performed_by: UserId,
) -> CoreResult<DocumentId> {
    let event = OrderEvent {
        order_id,
        event_type,
        metadata,
        performed_by,
        created_at: now,
    };

    let data = serde_json::to_value(&event)
        .map_err(|e| CoreError::serialization(e.to_string()))?;

    store
        .add(collections::ORDER_EVENTS, data, now)
        .map_err(|e| {
            tracing::error!(%e, "order event append failed");
            CoreError::write_failure(e.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidatea_store::InMemoryStore;

    #[test]
    fn status_change_is_appended_with_metadata() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let id = record_order_event(
            &store,
            now,
            OrderId::new("order-1"),
            OrderEventType::StatusChange,
            OrderEventMetadata {
                previous_status: Some("pending".into()),
                new_status: Some("shipped".into()),
                ..OrderEventMetadata::default()
            },
            UserId::new("admin-1"),
        )
        .unwrap();

        let doc = store
            .get(collections::ORDER_EVENTS, id.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["orderId"], "order-1");
        assert_eq!(doc.data["eventType"], "status_change");
        assert_eq!(doc.data["previousStatus"], "pending");
        assert_eq!(doc.data["newStatus"], "shipped");
        assert_eq!(doc.data["performedBy"], "admin-1");
        // Absent metadata fields are omitted, not stored as nulls.
        assert!(doc.data.get("trackingNumber").is_none());
    }

    #[test]
    fn refund_event_round_trips_typed() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let id = record_order_event(
            &store,
            now,
            OrderId::new("order-2"),
            OrderEventType::RefundProcessed,
            OrderEventMetadata {
                refund_amount: Some(2598),
                ..OrderEventMetadata::default()
            },
            UserId::new("system"),
        )
        .unwrap();

        let doc = store
            .get(collections::ORDER_EVENTS, id.as_str())
            .unwrap()
            .unwrap();
        let event: OrderEvent = doc.data_as().unwrap();
        assert_eq!(event.event_type, OrderEventType::RefundProcessed);
        assert_eq!(event.metadata.refund_amount, Some(2598));
    }
}

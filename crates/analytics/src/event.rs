use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidatea_core::{CoreError, CoreResult, DocumentId, ProductId, SessionId, UserId};
use vidatea_store::{DocumentStore, collections};

/// Telemetry event kinds emitted by the storefront.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventType {
    PageView,
    ProductView,
    AddToCart,
    BeginCheckout,
    Purchase,
}

/// Event-specific detail; absent fields are omitted from the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Monetary value in smallest currency unit (cents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

/// Client device context captured with each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
    pub is_mobile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsEvent {
    event_type: AnalyticsEventType,
    session_id: SessionId,
    user_id: Option<UserId>,
    event_data: EventData,
    device_info: DeviceInfo,
    created_at: DateTime<Utc>,
}

/// Fire-and-forget append into `analytics`.
///
/// Best effort: failure surfaces as [`CoreError::WriteFailure`], nothing is
/// retried or rolled back. `user_id` is absent for anonymous sessions and
/// stored as an explicit null.
pub fn track_event<S: DocumentStore>(
    store: &S,
    now: DateTime<Utc>,
    event_type: AnalyticsEventType,
    session_id: SessionId,
    user_id: Option<UserId>,
    event_data: EventData,
    device_info: DeviceInfo,
) -> CoreResult<DocumentId> {
    let event = AnalyticsEvent {
        event_type,
        session_id,
        user_id,
        event_data,
        device_info,
        created_at: now,
    };

    let data = serde_json::to_value(&event)
        .map_err(|e| CoreError::serialization(e.to_string()))?;

    store
        .add(collections::ANALYTICS, data, now)
        .map_err(|e| {
            tracing::error!(%e, "analytics append failed");
            CoreError::write_failure(e.to_string())
        })
}

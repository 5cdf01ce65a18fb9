//! Append-only telemetry sink.

pub mod event;

pub use event::{AnalyticsEventType, DeviceInfo, EventData, track_event};

//! Write-time validation layer.
//!
//! The deployed storefront enforced field shapes and per-document update
//! rate limits in a declarative rules engine colocated with the store. Here
//! that becomes an explicit in-process check the services run before writing:
//! required field shapes plus a last-write-timestamp guard.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;

use vidatea_core::{CoreError, CoreResult};

use crate::document::Document;

/// Required shape of a payload field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// Integer >= 0.
    NonNegativeInt,
    String,
    Number,
    Bool,
    Array,
}

impl FieldShape {
    fn matches(self, value: &JsonValue) -> bool {
        match self {
            FieldShape::NonNegativeInt => value.as_i64().is_some_and(|n| n >= 0),
            FieldShape::String => value.is_string(),
            FieldShape::Number => value.is_number(),
            FieldShape::Bool => value.is_boolean(),
            FieldShape::Array => value.is_array(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldShape::NonNegativeInt => "a non-negative integer",
            FieldShape::String => "a string",
            FieldShape::Number => "a number",
            FieldShape::Bool => "a boolean",
            FieldShape::Array => "an array",
        }
    }
}

/// Shape + rate-limit checks for writes into one collection.
#[derive(Debug, Clone, Default)]
pub struct WriteGuard {
    shapes: Vec<(String, FieldShape)>,
    min_update_interval: Option<Duration>,
}

impl WriteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field`, when present in the write, to match `shape`.
    pub fn require(mut self, field: impl Into<String>, shape: FieldShape) -> Self {
        self.shapes.push((field.into(), shape));
        self
    }

    /// Reject updates landing within `interval` of the document's last write.
    pub fn with_min_update_interval(mut self, interval: Duration) -> Self {
        self.min_update_interval = Some(interval);
        self
    }

    /// Validate `incoming` fields against the shapes, and the write's timing
    /// against the existing document's `updated_at`.
    pub fn check(
        &self,
        existing: Option<&Document>,
        incoming: &JsonValue,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        let Some(object) = incoming.as_object() else {
            return Err(CoreError::validation("write payload must be a JSON object"));
        };

        for (field, shape) in &self.shapes {
            if let Some(value) = object.get(field) {
                if !shape.matches(value) {
                    return Err(CoreError::validation(format!(
                        "field '{field}' must be {}",
                        shape.describe()
                    )));
                }
            }
        }

        if let (Some(interval), Some(doc)) = (self.min_update_interval, existing) {
            if now - doc.updated_at < interval {
                return Err(CoreError::validation(format!(
                    "document '{}' updated too recently",
                    doc.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn doc_updated_at(updated_at: DateTime<Utc>) -> Document {
        Document {
            id: "p1".into(),
            data: json!({"inventory": 5}),
            version: 1,
            updated_at,
        }
    }

    #[test]
    fn accepts_matching_shapes() {
        let guard = WriteGuard::new()
            .require("inventory", FieldShape::NonNegativeInt)
            .require("name", FieldShape::String);

        guard
            .check(None, &json!({"inventory": 3, "name": "Green Tea"}), Utc::now())
            .unwrap();
    }

    #[test]
    fn rejects_negative_inventory_shape() {
        let guard = WriteGuard::new().require("inventory", FieldShape::NonNegativeInt);
        let err = guard
            .check(None, &json!({"inventory": -1}), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn absent_fields_are_not_required() {
        let guard = WriteGuard::new().require("inventory", FieldShape::NonNegativeInt);
        guard.check(None, &json!({"name": "Green Tea"}), Utc::now()).unwrap();
    }

    #[test]
    fn rejects_update_within_min_interval() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let guard = WriteGuard::new().with_min_update_interval(Duration::seconds(10));

        let err = guard
            .check(
                Some(&doc_updated_at(t0)),
                &json!({"inventory": 2}),
                t0 + Duration::seconds(5),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        guard
            .check(
                Some(&doc_updated_at(t0)),
                &json!({"inventory": 2}),
                t0 + Duration::seconds(11),
            )
            .unwrap();
    }
}

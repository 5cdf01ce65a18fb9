//! Single-attempt optimistic transaction over a [`DocumentStore`].
//!
//! Reads performed through the transaction are stamped with the observed
//! document version; writes are buffered. Nothing touches the store until
//! [`run_transaction`] commits, at which point the store re-checks every
//! stamp and applies the write set atomically, or fails with
//! [`vidatea_core::CoreError::Conflict`] and applies nothing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use vidatea_core::{CoreError, CoreResult};

use crate::document::{Document, DocumentStore, ReadStamp, WriteOp};

/// Buffered read stamps + write set for one attempt.
pub struct Transaction<'a> {
    store: &'a dyn DocumentStore,
    reads: Vec<ReadStamp>,
    writes: Vec<WriteOp>,
}

impl<'a> Transaction<'a> {
    fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Read a document and stamp its observed version (0 if absent).
    pub fn get(&mut self, collection: &str, id: &str) -> CoreResult<Option<Document>> {
        let doc = self.store.get(collection, id)?;
        self.reads.push(ReadStamp {
            collection: collection.to_string(),
            id: id.to_string(),
            version: doc.as_ref().map(|d| d.version).unwrap_or(0),
        });
        Ok(doc)
    }

    /// Read and deserialize a document payload.
    pub fn get_as<T: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: &str,
    ) -> CoreResult<Option<T>> {
        match self.get(collection, id)? {
            Some(doc) => Ok(Some(doc.data_as()?)),
            None => Ok(None),
        }
    }

    /// Buffer a create-or-replace of the full payload.
    pub fn set<T: Serialize>(&mut self, collection: &str, id: &str, value: &T) -> CoreResult<()> {
        let data = serde_json::to_value(value)
            .map_err(|e| CoreError::serialization(e.to_string()))?;
        self.writes.push(WriteOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
        Ok(())
    }

    /// Buffer a field merge into an existing document.
    pub fn update(
        &mut self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, JsonValue>,
    ) {
        self.writes.push(WriteOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
    }
}

/// Run one transaction attempt.
///
/// The closure reads through the transaction and buffers writes; if it
/// returns `Ok`, the write set is committed against the read stamps. An `Err`
/// from the closure aborts with no store interaction. `now` stamps
/// `updated_at` on every written document.
pub fn run_transaction<T>(
    store: &dyn DocumentStore,
    now: DateTime<Utc>,
    f: impl FnOnce(&mut Transaction<'_>) -> CoreResult<T>,
) -> CoreResult<T> {
    let mut tx = Transaction::new(store);
    let out = f(&mut tx)?;
    store.commit(&tx.reads, tx.writes, now)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use serde_json::json;

    #[test]
    fn closure_error_leaves_store_untouched() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let result: CoreResult<()> = run_transaction(&store, now, |tx| {
            tx.set("products", "p1", &json!({"inventory": 5}))?;
            Err(CoreError::validation("abort"))
        });

        assert!(result.is_err());
        assert!(store.get("products", "p1").unwrap().is_none());
    }

    #[test]
    fn read_then_write_commits_together() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        store.commit(
            &[],
            vec![WriteOp::Set {
                collection: "products".into(),
                id: "p1".into(),
                data: json!({"inventory": 5}),
            }],
            now,
        )
        .unwrap();

        run_transaction(&store, now, |tx| {
            let doc = tx.get("products", "p1")?.ok_or(CoreError::NotFound)?;
            let current = doc.data["inventory"].as_i64().unwrap_or(0);
            tx.set("products", "p1", &json!({"inventory": current - 3}))?;
            tx.set("inventoryLogs", "log-1", &json!({"changeAmount": -3}))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(
            store.get("products", "p1").unwrap().unwrap().data["inventory"],
            2
        );
        assert!(store.get("inventoryLogs", "log-1").unwrap().is_some());
    }

    #[test]
    fn interleaved_write_between_read_and_commit_conflicts() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        store.commit(
            &[],
            vec![WriteOp::Set {
                collection: "products".into(),
                id: "p1".into(),
                data: json!({"inventory": 5}),
            }],
            now,
        )
        .unwrap();

        let result: CoreResult<()> = run_transaction(&store, now, |tx| {
            tx.get("products", "p1")?;

            // Another writer lands between our read and our commit.
            store.commit(
                &[],
                vec![WriteOp::Set {
                    collection: "products".into(),
                    id: "p1".into(),
                    data: json!({"inventory": 1}),
                }],
                now,
            )?;

            tx.set("products", "p1", &json!({"inventory": 4}))?;
            Ok(())
        });

        assert!(matches!(result, Err(CoreError::Conflict(_))));
        assert_eq!(
            store.get("products", "p1").unwrap().unwrap().data["inventory"],
            1
        );
    }
}

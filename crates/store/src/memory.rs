//! In-memory document store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use vidatea_core::{CoreError, CoreResult, DocumentId};

use crate::document::{Document, DocumentStore, ReadStamp, WriteOp};

#[derive(Debug, Clone)]
struct StoredDoc {
    data: JsonValue,
    version: u64,
    updated_at: DateTime<Utc>,
}

/// In-memory keyed document store with optimistic commit checks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, StoredDoc>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_object(data: &JsonValue) -> CoreResult<()> {
        if !data.is_object() {
            return Err(CoreError::validation("document payload must be a JSON object"));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryStore {
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| CoreError::write_failure("lock poisoned"))?;

        Ok(collections.get(collection).and_then(|docs| {
            docs.get(id).map(|doc| Document {
                id: id.to_string(),
                data: doc.data.clone(),
                version: doc.version,
                updated_at: doc.updated_at,
            })
        }))
    }

    fn add(&self, collection: &str, data: JsonValue, now: DateTime<Utc>) -> CoreResult<DocumentId> {
        Self::require_object(&data)?;

        let mut collections = self
            .collections
            .write()
            .map_err(|_| CoreError::write_failure("lock poisoned"))?;

        let id = DocumentId::generate();
        collections.entry(collection.to_string()).or_default().insert(
            id.to_string(),
            StoredDoc {
                data,
                version: 1,
                updated_at: now,
            },
        );

        Ok(id)
    }

    fn commit(
        &self,
        reads: &[ReadStamp],
        writes: Vec<WriteOp>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| CoreError::write_failure("lock poisoned"))?;

        // Conflict check first: every stamped read must still be at the
        // version observed inside the transaction (0 = absent).
        for stamp in reads {
            let current = collections
                .get(&stamp.collection)
                .and_then(|docs| docs.get(&stamp.id))
                .map(|doc| doc.version)
                .unwrap_or(0);

            if current != stamp.version {
                return Err(CoreError::conflict(format!(
                    "{}/{}: read version {}, now {}",
                    stamp.collection, stamp.id, stamp.version, current
                )));
            }
        }

        // Validate before applying so a bad write leaves nothing applied.
        for write in &writes {
            match write {
                WriteOp::Set { data, .. } => Self::require_object(data)?,
                WriteOp::Update { collection, id, .. } => {
                    let exists = collections
                        .get(collection)
                        .is_some_and(|docs| docs.contains_key(id));
                    if !exists {
                        return Err(CoreError::not_found());
                    }
                }
            }
        }

        for write in writes {
            match write {
                WriteOp::Set { collection, id, data } => {
                    let docs = collections.entry(collection).or_default();
                    let version = docs.get(&id).map(|doc| doc.version).unwrap_or(0) + 1;
                    docs.insert(
                        id,
                        StoredDoc {
                            data,
                            version,
                            updated_at: now,
                        },
                    );
                }
                WriteOp::Update { collection, id, fields } => {
                    // Existence checked above; merge fields into the payload.
                    let docs = collections.entry(collection).or_default();
                    if let Some(doc) = docs.get_mut(&id) {
                        if let Some(object) = doc.data.as_object_mut() {
                            for (key, value) in fields {
                                object.insert(key, value);
                            }
                        }
                        doc.version += 1;
                        doc.updated_at = now;
                    }
                }
            }
        }

        Ok(())
    }

    fn find_updated_before(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> CoreResult<Vec<String>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| CoreError::write_failure("lock poisoned"))?;

        let mut matches: Vec<(DateTime<Utc>, String)> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.updated_at < cutoff)
                    .map(|(id, doc)| (doc.updated_at, id.clone()))
                    .collect()
            })
            .unwrap_or_default();

        // Oldest first, deterministic order.
        matches.sort();
        Ok(matches.into_iter().map(|(_, id)| id).collect())
    }

    fn delete_batch(&self, collection: &str, ids: &[String]) -> CoreResult<usize> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| CoreError::write_failure("lock poisoned"))?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut deleted = 0;
        for id in ids {
            if docs.remove(id).is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}

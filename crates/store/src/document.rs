//! Store trait and document/write representations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use vidatea_core::{CoreResult, DocumentId};

/// A document as read from the store.
///
/// Payloads are schemaless JSON objects; the store never enforces field
/// shapes (that is [`crate::guard::WriteGuard`]'s job). `version` and
/// `updated_at` are store-assigned metadata:
///
/// - `version` starts at 1 and increments on every write. It backs the
///   optimistic concurrency check at transaction commit.
/// - `updated_at` is stamped by the store on every write (the server-assigned
///   timestamp of the modeled backend) and is what expiry queries compare
///   against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: JsonValue,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Deserialize the payload into a typed view.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> CoreResult<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| vidatea_core::CoreError::serialization(e.to_string()))
    }
}

/// Version of a document observed during a transaction read.
///
/// `version == 0` records that the document was absent at read time, so a
/// concurrent create also fails the commit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStamp {
    pub collection: String,
    pub id: String,
    pub version: u64,
}

/// A buffered write, applied only if the whole transaction commits.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create-or-replace the full payload.
    Set {
        collection: String,
        id: String,
        data: JsonValue,
    },
    /// Merge fields into an existing payload. Fails the commit if the
    /// document is absent.
    Update {
        collection: String,
        id: String,
        fields: serde_json::Map<String, JsonValue>,
    },
}

/// Keyed, schemaless document store.
///
/// ## Design Principles
///
/// - **No storage assumptions**: works with the in-memory implementation
///   (tests/dev) and future remote backends.
/// - **Optimistic concurrency**: reads are stamped with observed versions and
///   re-checked at `commit`; no pessimistic locks.
/// - **Single attempt**: a failed conflict check surfaces
///   [`vidatea_core::CoreError::Conflict`] and applies nothing. Callers pick
///   their own retry policy ([`crate::retry::RetryPolicy`]).
///
/// ## Commit Semantics
///
/// `commit()` must, under one unit of mutual exclusion:
/// - re-read the current version of every stamped document and fail with
///   `Conflict` on any mismatch (absent documents count as version 0),
/// - otherwise apply every buffered write, bumping versions and stamping
///   `updated_at = now`,
/// - apply all writes or none.
///
/// ## Non-transactional Primitives
///
/// `add` (append with a minted auto-ID), `find_updated_before` and
/// `delete_batch` carry no isolation guarantee relative to transactions
/// beyond the store's internal consistency; the janitor's scan-then-delete
/// race is accepted by design.
pub trait DocumentStore: Send + Sync {
    /// Read one document.
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Document>>;

    /// Append a document under a fresh auto-ID, outside any transaction.
    fn add(&self, collection: &str, data: JsonValue, now: DateTime<Utc>) -> CoreResult<DocumentId>;

    /// Atomically validate read stamps and apply buffered writes.
    fn commit(
        &self,
        reads: &[ReadStamp],
        writes: Vec<WriteOp>,
        now: DateTime<Utc>,
    ) -> CoreResult<()>;

    /// IDs of documents whose `updated_at` is strictly before `cutoff`.
    fn find_updated_before(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> CoreResult<Vec<String>>;

    /// Delete the given documents in one batch; missing IDs are skipped.
    /// Returns the number actually deleted.
    fn delete_batch(&self, collection: &str, ids: &[String]) -> CoreResult<usize>;
}

impl<'a, S> DocumentStore for &'a S
where
    S: DocumentStore + ?Sized,
{
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Document>> {
        (**self).get(collection, id)
    }

    fn add(&self, collection: &str, data: JsonValue, now: DateTime<Utc>) -> CoreResult<DocumentId> {
        (**self).add(collection, data, now)
    }

    fn commit(
        &self,
        reads: &[ReadStamp],
        writes: Vec<WriteOp>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        (**self).commit(reads, writes, now)
    }

    fn find_updated_before(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> CoreResult<Vec<String>> {
        (**self).find_updated_before(collection, cutoff)
    }

    fn delete_batch(&self, collection: &str, ids: &[String]) -> CoreResult<usize> {
        (**self).delete_batch(collection, ids)
    }
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Document>> {
        (**self).get(collection, id)
    }

    fn add(&self, collection: &str, data: JsonValue, now: DateTime<Utc>) -> CoreResult<DocumentId> {
        (**self).add(collection, data, now)
    }

    fn commit(
        &self,
        reads: &[ReadStamp],
        writes: Vec<WriteOp>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        (**self).commit(reads, writes, now)
    }

    fn find_updated_before(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> CoreResult<Vec<String>> {
        (**self).find_updated_before(collection, cutoff)
    }

    fn delete_batch(&self, collection: &str, ids: &[String]) -> CoreResult<usize> {
        (**self).delete_batch(collection, ids)
    }
}

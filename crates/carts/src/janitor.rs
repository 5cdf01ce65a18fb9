use chrono::Duration;

use vidatea_core::{Clock, CoreResult};
use vidatea_store::{DocumentStore, collections};

/// Default staleness threshold for abandoned carts.
const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Background sweep that deletes stale cart documents.
///
/// Scan and delete are separate store calls, so a cart updated in between
/// can still be deleted; carts are disposable client-state caches, so that
/// race is accepted rather than locked around.
#[derive(Debug)]
pub struct CartJanitor<S, C> {
    store: S,
    clock: C,
    max_age: Duration,
}

impl<S, C> CartJanitor<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Delete carts untouched for longer than `max_age`; returns the count
    /// deleted. Zero matches is a normal empty sweep, not an error.
    pub fn sweep(&self) -> CoreResult<usize> {
        let cutoff = self.clock.now() - self.max_age;

        let stale = self.store.find_updated_before(collections::CARTS, cutoff)?;
        if stale.is_empty() {
            return Ok(0);
        }

        let deleted = self.store.delete_batch(collections::CARTS, &stale)?;
        tracing::info!(deleted, "swept expired carts");

        Ok(deleted)
    }
}

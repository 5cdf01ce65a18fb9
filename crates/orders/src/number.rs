use chrono::Datelike;
use serde::{Deserialize, Serialize};

use vidatea_core::{Clock, CoreResult};
use vidatea_store::{DocumentStore, collections, run_transaction};

/// A human-readable order number, `PREFIX-YYYY-NNNN`.
///
/// The sequence restarts at 1 each calendar year. Padding is four digits and
/// widens naturally past 9999.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderNumber {
    pub prefix: String,
    pub year: i32,
    pub number: u32,
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}-{:04}", self.prefix, self.year, self.number)
    }
}

/// Counter payload at `counters/orderNumber`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CounterDoc {
    year: i32,
    count: u32,
}

/// Per-year sequential order-number allocator.
///
/// `next` is one store transaction against the singleton counter document,
/// so concurrent callers can never commit the same count: the loser fails
/// with [`vidatea_core::CoreError::Conflict`] and must retry. Allocation is
/// deliberately not idempotent (two calls yield two numbers), and a number
/// allocated but never attached to an order is a permanent gap in the
/// sequence; both are accepted behavior.
#[derive(Debug)]
pub struct OrderNumberAllocator<S, C> {
    store: S,
    clock: C,
    prefix: String,
}

impl<S, C> OrderNumberAllocator<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            prefix: "VT".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Allocate the next number for the current year.
    ///
    /// An absent counter, or one stored under a different year, restarts the
    /// sequence at 1.
    pub fn next(&self) -> CoreResult<OrderNumber> {
        let now = self.clock.now();
        let year = now.year();

        let number = run_transaction(&self.store, now, |tx| {
            let counter: Option<CounterDoc> =
                tx.get_as(collections::COUNTERS, collections::ORDER_NUMBER_COUNTER)?;

            let next = match counter {
                Some(c) if c.year == year => c.count + 1,
                _ => 1,
            };

            tx.set(
                collections::COUNTERS,
                collections::ORDER_NUMBER_COUNTER,
                &CounterDoc { year, count: next },
            )?;

            Ok(next)
        })?;

        let allocated = OrderNumber {
            prefix: self.prefix.clone(),
            year,
            number,
        };
        tracing::debug!(order_number = %allocated, "order number allocated");

        Ok(allocated)
    }
}

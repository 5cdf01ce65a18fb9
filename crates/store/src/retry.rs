//! Call-site retry policy for transaction conflicts.
//!
//! The store primitives are deliberately single-attempt; this wrapper is the
//! explicit bounded-retry-with-backoff layer callers opt into. Only
//! [`vidatea_core::CoreError::Conflict`] is retried; every other error
//! surfaces immediately.

use std::time::Duration;

use vidatea_core::CoreResult;

/// Backoff stops doubling past this exponent (64x the base delay).
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Bounded retry with exponential backoff.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Run `op`, retrying conflicts up to `max_attempts` total attempts.
    /// Backoff doubles per attempt (base, 2x, 4x, ...) up to a 64x ceiling.
    pub fn run<T>(&self, mut op: impl FnMut() -> CoreResult<T>) -> CoreResult<T> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op() {
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(attempt, %err, "transaction conflict, backing off");
                    let exponent = (attempt - 1).min(MAX_BACKOFF_EXPONENT);
                    std::thread::sleep(self.base_delay * 2u32.pow(exponent));
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidatea_core::CoreError;

    #[test]
    fn returns_first_success() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;

        let out: CoreResult<u32> = policy.run(|| {
            calls += 1;
            if calls < 3 {
                Err(CoreError::conflict("contended"))
            } else {
                Ok(calls)
            }
        });

        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let mut calls = 0;

        let out: CoreResult<()> = policy.run(|| {
            calls += 1;
            Err(CoreError::conflict("contended"))
        });

        assert!(matches!(out, Err(CoreError::Conflict(_))));
        assert_eq!(calls, 2);
    }

    #[test]
    fn non_retryable_errors_surface_immediately() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;

        let out: CoreResult<()> = policy.run(|| {
            calls += 1;
            Err(CoreError::not_found())
        });

        assert!(matches!(out, Err(CoreError::NotFound)));
        assert_eq!(calls, 1);
    }
}

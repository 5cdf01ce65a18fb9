//! Tracing/logging initialization.
//!
//! JSON structured logs with timestamps; `RUST_LOG` overrides the filter.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `default_filter` applies when `RUST_LOG` is unset (falls back to `info`).
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or("info")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

//! Shared tracing/logging setup.

/// Initialize process-wide logging with the default filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(None);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

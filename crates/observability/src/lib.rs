//! Shared tracing/logging setup for passbook binaries and test harnesses.

/// Tracing configuration (filters, format).
pub mod tracing;

/// Initialize process-wide observability (structured logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

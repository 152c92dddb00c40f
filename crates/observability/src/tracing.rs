//! Tracing/logging initialization.
//!
//! JSON-formatted structured logs, filtered through `RUST_LOG`. Ledger
//! operations emit through the engine's observer hook, so this is the only
//! place a subscriber gets installed.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
}

/// Initialize with explicit filter directives, ignoring `RUST_LOG`.
///
/// For embedders and test harnesses that want a fixed level.
pub fn init_with_directives(directives: &str) {
    init_with_filter(EnvFilter::new(directives));
}

fn init_with_filter(filter: EnvFilter) {
    // JSON logs + timestamps; only the first call installs a subscriber.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("structured logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with_directives("warn");
        init_with_directives("debug");
        init();
    }
}

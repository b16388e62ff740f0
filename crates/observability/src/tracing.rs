//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the process.
///
/// Respects `RUST_LOG`, falling back to `info`. Safe to call multiple
/// times; subsequent calls are no-ops.
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize with an explicit fallback filter. `RUST_LOG` still wins
/// when it is set.
pub fn init_with_default_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let description = filter.to_string();

    // JSON lines + timestamps, configurable via RUST_LOG.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %description, "tracing initialized");
    }
}

//! Tracing/logging initialization (shared setup).

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing/logging.
///
/// JSON logs with timestamps, filterable via `RUST_LOG`. Safe to call
/// multiple times; subsequent calls become no-ops.
pub fn init() {
    init_with_default_filter("info");
}

/// Like [`init`], with an explicit fallback filter for when `RUST_LOG` is
/// unset (tests use "warn" to keep output quiet).
pub fn init_with_default_filter(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

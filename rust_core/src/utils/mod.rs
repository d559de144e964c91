//! Shared utilities: money/rounding helpers and tracing setup.

pub mod money;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG` for binaries and tests.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

//! Logging setup
//!
//! The library only emits `tracing` events; binaries and notebooks opt in to
//! output with [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber.
///
/// `RUST_LOG` overrides `default_filter` when set. Returns `false` if a global
/// subscriber was already installed, so calling this twice is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

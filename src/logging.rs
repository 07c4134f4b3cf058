//! Logging initialization
//!
//! Diagnostics go through `tracing`; `RUST_LOG` overrides the default
//! filter (e.g. `RUST_LOG=games_listing=debug` to see skipped records).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,games_listing=info";

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

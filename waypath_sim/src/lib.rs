// waypath_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the waypath_sim crate.
pub mod prelude;

// This module contains all the simulation-specific logic.
pub mod cli;
pub mod simulation;

use tracing_subscriber::EnvFilter;

/// Default filter when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "info,waypath_core=info,waypath_sim=info";

/// Installs the global tracing subscriber. An explicit level wins over
/// `RUST_LOG`, which wins over [`DEFAULT_LOG_FILTER`].
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

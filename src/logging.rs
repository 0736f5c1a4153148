//! Tracing subscriber setup for the CLI and embedding hosts.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when neither an explicit level nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs a stderr `fmt` subscriber.
///
/// `level` wins over `RUST_LOG`; without either, [`DEFAULT_LOG_FILTER`] is
/// used. Returns `false` if a global subscriber was already installed, which
/// happens when a host or a test harness set one up first.
pub fn init_logging(level: Option<&str>) -> bool {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

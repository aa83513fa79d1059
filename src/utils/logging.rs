// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber for the CLI session.
///
/// `RUST_LOG` picks the filter (`info` when unset). `valor_finder=trace` shows
/// the per-token and per-column match scores. Everything goes to stderr and
/// answers stay alone on stdout.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    tracing::debug!("Logging to stderr with filter from RUST_LOG");
}

//! Tracing subscriber setup for the binary.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured level.
fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a compact stderr formatter. Safe to call more than once; later
/// calls are ignored.
pub fn init_logging(level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt_layer)
        .try_init();
}

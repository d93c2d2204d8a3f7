use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn default_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info`
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(default_filter("info,tower_http=info,axum=info"))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(default_filter("info"))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Compact logs on stderr, for processes whose stdout carries a payload.
pub fn init_logging_stderr() {
    let _ = fmt()
        .with_env_filter(default_filter("info"))
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

//! Logging bootstrap
//!
//! Sets up the tracing subscriber the host calls into once at startup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing at the given level
///
/// Level strings are normalized ("warning" becomes "warn", "critical"
/// becomes "error"); anything unrecognized falls back to "info". An
/// explicit `RUST_LOG` takes precedence.
pub fn init_logging(log_level: &str) {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    let level = match level.as_str() {
        "debug" | "info" | "warn" | "error" => level.as_str(),
        "warning" => "warn",
        "critical" => "error",
        _ => "info",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

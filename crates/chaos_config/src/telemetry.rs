//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::LogFormat;

/// Filter used when `RUST_LOG` is unset: everything at `info`, the chaos
/// crates and request tracing at `debug`
pub const DEFAULT_LOG_FILTER: &str =
    "info,chaos_core=debug,chaos_http=debug,chaos_grpc=debug,tower_http=debug";

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn second_init_fails() {
        // Only this test installs a subscriber in the unit test binary
        let first = init_tracing("info", LogFormat::Text);
        assert!(first.is_ok());

        let second = init_tracing("debug", LogFormat::Json);
        assert!(matches!(second, Err(TelemetryError::Init(_))));
    }

    #[test]
    fn default_filter_covers_every_crate() {
        let subscriber = tracing_subscriber::registry().with(EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "chaos_demo::shutdown", Level::INFO));
            assert!(tracing::enabled!(target: "chaos_demo", Level::ERROR));
            assert!(tracing::enabled!(target: "chaos_http", Level::WARN));
            assert!(tracing::enabled!(target: "chaos_grpc", Level::WARN));
            assert!(tracing::enabled!(target: "chaos_grpc::timeout", Level::DEBUG));
            assert!(tracing::enabled!(target: "chaos_core::engine", Level::DEBUG));
            assert!(tracing::enabled!(target: "tower_http::trace", Level::DEBUG));
            assert!(!tracing::enabled!(target: "hyper", Level::DEBUG));
        });
    }
}

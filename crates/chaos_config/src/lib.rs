//! Configuration loading and logging setup for Faultline
//!
//! Settings come from built-in defaults, an optional `faultline.{toml,yaml,json}`
//! file and `FAULTLINE_*` environment variables, in that order. Nested keys
//! use a double underscore: `FAULTLINE_CHAOS__FAILURE_RATE=0.3`.

pub mod error;
pub mod settings;
pub mod telemetry;

pub use error::ConfigError;
pub use settings::{AppSettings, ChaosSettings, ENV_PREFIX, LogFormat, ServerSettings};
pub use telemetry::{DEFAULT_LOG_FILTER, TelemetryError, init_tracing};

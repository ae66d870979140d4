//! Application settings

use std::{path::Path, time::Duration};

use chaos_core::ChaosPolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::ConfigError;

/// Prefix for environment overrides (`FAULTLINE_CHAOS__ENABLED=true`)
pub const ENV_PREFIX: &str = "FAULTLINE";

/// File stem searched in the working directory when no path is given
const DEFAULT_FILE_STEM: &str = "faultline";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppSettings {
    /// Chaos injection
    #[serde(default)]
    #[validate(nested)]
    pub chaos: ChaosSettings,

    /// Demo server
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerSettings,
}

/// Chaos injection settings, as written in files and the environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChaosSettings {
    /// Master switch
    pub enabled: bool,

    /// Header or metadata key that must be present for chaos to apply.
    /// Unset or empty applies chaos to every request.
    pub trigger_header: Option<String>,

    /// Delay added before the failure decision
    pub latency_ms: u64,

    /// Probability of replacing the response with an injected failure
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0.0 and 1.0"))]
    pub failure_rate: f64,
}

impl ChaosSettings {
    /// Build the immutable policy the middleware runs with
    pub fn to_policy(&self) -> Result<ChaosPolicy, ConfigError> {
        let mut policy = ChaosPolicy::disabled()
            .with_enabled(self.enabled)
            .with_latency(Duration::from_millis(self.latency_ms))
            .with_failure_rate(self.failure_rate);

        if let Some(key) = self.trigger_header.as_deref().filter(|key| !key.is_empty()) {
            policy = policy.with_trigger(key);
        }

        policy.validate()?;
        Ok(policy)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Demo server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to
    #[validate(length(min = 1, message = "must not be empty"))]
    pub host: String,

    /// Port for the HTTP demo
    pub http_port: u16,

    /// Port for the gRPC demo
    pub grpc_port: u16,

    /// Grace period for in-flight requests on shutdown
    pub shutdown_timeout_secs: u64,

    /// Per-request deadline for the HTTP demo; unset means unbounded
    pub request_timeout_ms: Option<u64>,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 3000,
            grpc_port: 50051,
            shutdown_timeout_secs: 30,
            request_timeout_ms: None,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerSettings {
    /// Shutdown grace period as a duration
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Per-request deadline, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl AppSettings {
    /// Load settings from defaults, a file and the process environment.
    ///
    /// With `path`, that file must exist. Without it, `faultline.*` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppSettings::load`], reading environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_FILE_STEM).required(false)),
        };

        // Environment overrides (e.g., FAULTLINE_CHAOS__LATENCY_MS=200)
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        settings.chaos.to_policy()?;

        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Validated chaos policy
    pub fn policy(&self) -> Result<ChaosPolicy, ConfigError> {
        self.chaos.to_policy()
    }
}

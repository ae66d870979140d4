//! Chaos policy definition.
//!
//! A [`ChaosPolicy`] is built once at setup time and shared read-only by
//! every request afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, Result};

/// Immutable description of the chaos to inject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaosPolicy {
    /// Master switch. When false nothing else is evaluated.
    #[serde(default)]
    pub enabled: bool,

    /// Request signal (header or metadata key) that must be present for
    /// chaos to apply. `None` or empty applies chaos to every request.
    #[serde(default)]
    pub trigger_key: Option<String>,

    /// Delay injected before the failure decision
    #[serde(default, rename = "latency_ms", with = "duration_ms")]
    pub latency: Duration,

    /// Probability (0.0 to 1.0) that a request is failed outright
    #[serde(default)]
    pub failure_rate: f64,
}

impl Default for ChaosPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ChaosPolicy {
    /// A policy that never applies
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            trigger_key: None,
            latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// An enabled policy with no trigger, no latency and no failures
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            trigger_key: None,
            latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// Require the given request signal to be present
    #[must_use]
    pub fn with_trigger(mut self, key: impl Into<String>) -> Self {
        self.trigger_key = Some(key.into());
        self
    }

    /// Set the injected latency
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the failure probability
    #[must_use]
    pub const fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Enable or disable the policy
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The trigger key, with an empty key treated as absent
    pub fn trigger(&self) -> Option<&str> {
        self.trigger_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Check that the policy values are in range.
    ///
    /// The engine itself never calls this; out-of-range rates are handled
    /// with clamped semantics at sampling time.
    pub fn validate(&self) -> Result<()> {
        if self.failure_rate.is_nan() || !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ChaosError::InvalidPolicy(format!(
                "failure_rate {} outside [0, 1]",
                self.failure_rate
            )));
        }
        Ok(())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

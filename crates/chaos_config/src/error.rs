//! Configuration errors

use chaos_core::ChaosError;
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A field is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// The settings do not describe a usable chaos policy
    #[error(transparent)]
    Policy(#[from] ChaosError),
}

//! Error taxonomy for chaos injection

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed machine-readable code carried by every injected failure
pub const INJECTED_FAILURE_CODE: &str = "chaos_injected";

/// Fixed human-readable message carried by every injected failure
pub const INJECTED_FAILURE_MESSAGE: &str = "Chaos Injected: Service Unavailable";

/// Why a request was canceled while chaos latency was pending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    /// The request deadline elapsed
    DeadlineExceeded,
    /// The client went away before a response was produced
    ClientDisconnected,
    /// Canceled by the caller for some other reason
    Canceled(String),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
            Self::ClientDisconnected => write!(f, "client disconnected"),
            Self::Canceled(reason) => write!(f, "canceled: {reason}"),
        }
    }
}

/// A deliberately injected "service unavailable" outcome.
///
/// This is a normal result value, not a crash. It always carries
/// [`INJECTED_FAILURE_CODE`] and [`INJECTED_FAILURE_MESSAGE`] so it can be
/// told apart from genuine downstream errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("{}", INJECTED_FAILURE_MESSAGE)]
pub struct InjectedFailure;

impl InjectedFailure {
    /// Machine-readable code
    pub const fn code(&self) -> &'static str {
        INJECTED_FAILURE_CODE
    }

    /// Human-readable message
    pub const fn message(&self) -> &'static str {
        INJECTED_FAILURE_MESSAGE
    }
}

/// Errors surfaced by the chaos engine and its callers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChaosError {
    /// The caller's context was canceled during latency injection
    #[error("Request canceled during injected latency: {0}")]
    Canceled(CancelReason),

    /// A synthetic failure was injected
    #[error(transparent)]
    Injected(#[from] InjectedFailure),

    /// A policy value is out of range (raised by validation, never by the engine)
    #[error("Invalid chaos policy: {0}")]
    InvalidPolicy(String),
}

impl From<CancelReason> for ChaosError {
    fn from(reason: CancelReason) -> Self {
        Self::Canceled(reason)
    }
}

/// Result alias for chaos operations
pub type Result<T> = std::result::Result<T, ChaosError>;

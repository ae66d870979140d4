//! The interception contract shared by every transport.
//!
//! Per request the engine walks
//! `Received → GateEvaluated → {Passthrough | DelayPending}
//!  → {Aborted | DelayElapsed} → {FailureShortCircuit | Forwarded}`.
//! Transports only translate the resulting [`Interception`] into their own
//! response vocabulary.

use std::{future::Future, sync::Arc};

use tracing::{debug, trace};

use crate::{
    cancellation::CancellationSignal,
    error::{CancelReason, ChaosError, InjectedFailure},
    gate::should_apply,
    latency::{DelayOutcome, inject_latency},
    policy::ChaosPolicy,
    sampler::FailureSampler,
};

/// States a request can pass through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptionStage {
    /// Gate said no; straight to the downstream handler
    Passthrough,
    /// Latency injection in progress
    DelayPending,
    /// Latency injection finished (or was skipped)
    DelayElapsed,
    /// Canceled while the delay was pending
    Aborted,
    /// Synthetic failure returned instead of calling downstream
    FailureShortCircuit,
    /// Downstream handler invoked
    Forwarded,
}

/// Terminal outcome of running the contract for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception<R> {
    /// The downstream handler ran; its result is returned unchanged
    Forwarded(R),
    /// A synthetic failure was produced; downstream was not invoked
    ShortCircuited(InjectedFailure),
    /// The caller's signal fired during the delay; downstream was not invoked
    Aborted(CancelReason),
}

impl<R> Interception<R> {
    /// The stage this outcome corresponds to
    pub const fn stage(&self) -> InterceptionStage {
        match self {
            Self::Forwarded(_) => InterceptionStage::Forwarded,
            Self::ShortCircuited(_) => InterceptionStage::FailureShortCircuit,
            Self::Aborted(_) => InterceptionStage::Aborted,
        }
    }

    /// Whether the downstream handler was invoked
    pub const fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forwarded(_))
    }

    /// Collapse into a `Result`, mapping synthetic outcomes to [`ChaosError`]
    pub fn into_result(self) -> Result<R, ChaosError> {
        match self {
            Self::Forwarded(result) => Ok(result),
            Self::ShortCircuited(failure) => Err(ChaosError::Injected(failure)),
            Self::Aborted(reason) => Err(ChaosError::Canceled(reason)),
        }
    }
}

/// Runs the interception contract for a fixed policy
#[derive(Debug, Clone, Default)]
pub struct ChaosEngine {
    policy: Arc<ChaosPolicy>,
    sampler: FailureSampler,
}

impl ChaosEngine {
    /// Create an engine using the thread-local random source
    pub fn new(policy: ChaosPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            sampler: FailureSampler::thread_local(),
        }
    }

    /// Create an engine with a specific sampler
    pub fn with_sampler(policy: ChaosPolicy, sampler: FailureSampler) -> Self {
        Self {
            policy: Arc::new(policy),
            sampler,
        }
    }

    /// The policy this engine applies
    pub fn policy(&self) -> &ChaosPolicy {
        &self.policy
    }

    /// Run the contract for one request.
    ///
    /// `forward` is invoked at most once, and only on the `Forwarded` path.
    pub async fn intercept<F, Fut, R>(
        &self,
        trigger_present: bool,
        mut cancellation: CancellationSignal,
        forward: F,
    ) -> Interception<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let policy = &*self.policy;

        if !should_apply(policy, trigger_present) {
            trace!(stage = ?InterceptionStage::Passthrough, "chaos gate closed");
            return Interception::Forwarded(forward().await);
        }

        if !policy.latency.is_zero() {
            debug!(
                stage = ?InterceptionStage::DelayPending,
                latency = ?policy.latency,
                "injecting latency"
            );
            if let DelayOutcome::Canceled(reason) =
                inject_latency(policy.latency, &mut cancellation).await
            {
                debug!(
                    stage = ?InterceptionStage::Aborted,
                    %reason,
                    "request canceled during injected latency"
                );
                return Interception::Aborted(reason);
            }
        }
        trace!(stage = ?InterceptionStage::DelayElapsed, "latency phase finished");

        if self.sampler.should_fail(policy.failure_rate) {
            debug!(
                stage = ?InterceptionStage::FailureShortCircuit,
                failure_rate = policy.failure_rate,
                "injecting failure"
            );
            return Interception::ShortCircuited(InjectedFailure);
        }

        trace!(stage = ?InterceptionStage::Forwarded, "forwarding after chaos");
        Interception::Forwarded(forward().await)
    }
}

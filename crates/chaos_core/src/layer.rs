//! Tower middleware running the interception contract.
//!
//! [`ChaosLayer`] owns the gate/delay/sample logic once. A [`Transport`]
//! supplies the protocol-specific parts: reading the trigger and the
//! cancellation signal off a request, and rendering synthetic outcomes as
//! native responses.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::{Layer, Service};

use crate::{
    cancellation::CancellationSignal,
    engine::{ChaosEngine, Interception},
    error::{CancelReason, InjectedFailure},
    policy::ChaosPolicy,
    sampler::FailureSampler,
};

/// Protocol-specific half of a chaos adapter
pub trait Transport<Req, Resp>: Clone + Send + Sync + 'static {
    /// Whether `req` carries at least one non-empty value for `key`
    fn trigger_present(&self, req: &Req, key: &str) -> bool;

    /// The cancellation signal bound to `req`
    fn cancellation(&self, req: &Req) -> CancellationSignal;

    /// Render an injected failure
    fn render_failure(&self, failure: &InjectedFailure) -> Resp;

    /// Render a request that was canceled during injected latency.
    ///
    /// Must not look like a success.
    fn render_aborted(&self, reason: &CancelReason) -> Resp;
}

/// Layer applying a [`ChaosPolicy`] through a [`Transport`]
#[derive(Debug, Clone)]
pub struct ChaosLayer<T> {
    engine: ChaosEngine,
    transport: T,
}

impl<T> ChaosLayer<T> {
    /// Create a new chaos layer
    pub fn new(policy: ChaosPolicy, transport: T) -> Self {
        Self {
            engine: ChaosEngine::new(policy),
            transport,
        }
    }

    /// Create a chaos layer drawing from a specific sampler
    pub fn with_sampler(policy: ChaosPolicy, sampler: FailureSampler, transport: T) -> Self {
        Self {
            engine: ChaosEngine::with_sampler(policy, sampler),
            transport,
        }
    }

    /// The policy applied by this layer
    pub fn policy(&self) -> &ChaosPolicy {
        self.engine.policy()
    }
}

impl<S, T: Clone> Layer<S> for ChaosLayer<T> {
    type Service = ChaosService<S, T>;

    fn layer(&self, inner: S) -> Self::Service {
        ChaosService {
            inner,
            engine: self.engine.clone(),
            transport: self.transport.clone(),
        }
    }
}

/// Middleware service produced by [`ChaosLayer`]
#[derive(Debug, Clone)]
pub struct ChaosService<S, T> {
    inner: S,
    engine: ChaosEngine,
    transport: T,
}

impl<S, T, Req> Service<Req> for ChaosService<S, T>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Future: Send,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
    T: Transport<Req, S::Response>,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let engine = self.engine.clone();
        let transport = self.transport.clone();
        // Keep the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let trigger_present = engine.policy().enabled
                && engine
                    .policy()
                    .trigger()
                    .is_some_and(|key| transport.trigger_present(&req, key));
            let cancellation = transport.cancellation(&req);

            match engine
                .intercept(trigger_present, cancellation, move || inner.call(req))
                .await
            {
                Interception::Forwarded(result) => result,
                Interception::ShortCircuited(failure) => Ok(transport.render_failure(&failure)),
                Interception::Aborted(reason) => Ok(transport.render_aborted(&reason)),
            }
        })
    }
}

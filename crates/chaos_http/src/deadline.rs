//! Request deadline middleware
//!
//! Puts a [`CancellationSignal`] bounded by a per-request deadline into the
//! request extensions, where the chaos layer picks it up. Install it outside
//! (after, in axum's `.layer` order) the chaos layer.

use std::{
    task::{Context, Poll},
    time::Duration,
};

use axum::http::Request;
use chaos_core::CancellationSignal;
use tokio::time::Instant;
use tower::{Layer, Service};

/// Layer that bounds each request by a deadline
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadlineLayer {
    timeout: Duration,
}

impl RequestDeadlineLayer {
    /// Deadline `timeout` after the request enters the layer
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<S> Layer<S> for RequestDeadlineLayer {
    type Service = RequestDeadline<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestDeadline {
            inner,
            timeout: self.timeout,
        }
    }
}

/// Service inserting a deadline-bounded [`CancellationSignal`]
#[derive(Debug, Clone)]
pub struct RequestDeadline<S> {
    inner: S,
    timeout: Duration,
}

impl<S, B> Service<Request<B>> for RequestDeadline<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let deadline = Instant::now() + self.timeout;
        // Combine with a signal an outer layer may already have attached
        let signal = request
            .extensions_mut()
            .remove::<CancellationSignal>()
            .map_or_else(
                || CancellationSignal::with_deadline(deadline),
                |existing| existing.and_deadline(deadline),
            );
        request.extensions_mut().insert(signal);
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tower::{ServiceExt, service_fn};

    use super::*;

    #[tokio::test]
    async fn inserts_deadline_signal() {
        let svc = RequestDeadlineLayer::new(Duration::from_secs(5)).layer(service_fn(
            |req: Request<()>| async move {
                Ok::<_, Infallible>(req.extensions().get::<CancellationSignal>().cloned())
            },
        ));

        let before = Instant::now();
        let signal = svc.oneshot(Request::new(())).await.unwrap().unwrap();
        let deadline = signal.deadline().unwrap();
        assert!(deadline >= before + Duration::from_secs(5));
        assert!(signal.reason().is_none());
    }

    #[tokio::test]
    async fn keeps_earlier_existing_deadline() {
        let svc = RequestDeadlineLayer::new(Duration::from_secs(60)).layer(service_fn(
            |req: Request<()>| async move {
                Ok::<_, Infallible>(req.extensions().get::<CancellationSignal>().cloned())
            },
        ));

        let early = Instant::now() + Duration::from_millis(10);
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(CancellationSignal::with_deadline(early));

        let signal = svc.oneshot(request).await.unwrap().unwrap();
        assert_eq!(signal.deadline(), Some(early));
    }
}

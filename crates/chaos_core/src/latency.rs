//! Cancellation-aware latency injection.

use std::time::Duration;

use tokio::time;

use crate::{cancellation::CancellationSignal, error::CancelReason};

/// Outcome of a latency injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayOutcome {
    /// The full duration elapsed (or there was nothing to wait for)
    Completed,
    /// The caller's signal fired first
    Canceled(CancelReason),
}

impl DelayOutcome {
    /// Whether the delay ran to completion
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Suspend until `latency` elapses or `cancellation` fires, whichever is first.
///
/// A zero latency returns immediately without yielding. An already-fired
/// signal wins over an elapsed timer.
pub async fn inject_latency(
    latency: Duration,
    cancellation: &mut CancellationSignal,
) -> DelayOutcome {
    if latency.is_zero() {
        return DelayOutcome::Completed;
    }

    tokio::select! {
        biased;
        reason = cancellation.cancelled() => DelayOutcome::Canceled(reason),
        () = time::sleep(latency) => DelayOutcome::Completed,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn zero_latency_completes_immediately() {
        let (handle, mut signal) = CancellationSignal::pair();
        handle.cancel(CancelReason::ClientDisconnected);

        // Nothing to wait for, so even a fired signal is not consulted
        let outcome = inject_latency(Duration::ZERO, &mut signal).await;
        assert_eq!(outcome, DelayOutcome::Completed);
    }

    #[tokio::test]
    async fn waits_for_duration() {
        let mut signal = CancellationSignal::never();
        let start = Instant::now();
        let outcome = inject_latency(Duration::from_millis(50), &mut signal).await;

        assert!(outcome.is_completed());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn respects_deadline() {
        let mut signal = CancellationSignal::with_timeout(Duration::from_millis(10));
        let start = Instant::now();
        let outcome = inject_latency(Duration::from_secs(2), &mut signal).await;

        assert_eq!(outcome, DelayOutcome::Canceled(CancelReason::DeadlineExceeded));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn respects_explicit_cancel() {
        let (handle, mut signal) = CancellationSignal::pair();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(10)).await;
            handle.cancel(CancelReason::ClientDisconnected);
        });

        let start = Instant::now();
        let outcome = inject_latency(Duration::from_secs(2), &mut signal).await;

        assert_eq!(
            outcome,
            DelayOutcome::Canceled(CancelReason::ClientDisconnected)
        );
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn already_cancelled_wins() {
        let (handle, mut signal) = CancellationSignal::pair();
        handle.cancel(CancelReason::Canceled("early".to_string()));

        let outcome = inject_latency(Duration::from_millis(1), &mut signal).await;
        assert_eq!(
            outcome,
            DelayOutcome::Canceled(CancelReason::Canceled("early".to_string()))
        );
    }
}

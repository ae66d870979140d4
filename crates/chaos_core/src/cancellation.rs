//! Cancellation signals for in-flight requests.
//!
//! A [`CancellationSignal`] fires when either its [`CancellationHandle`]
//! cancels it or its deadline passes, whichever comes first.

use std::{future, sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{self, Instant},
};

use crate::error::CancelReason;

/// Sending half of a cancellation source
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    sender: Arc<watch::Sender<Option<CancelReason>>>,
}

impl CancellationHandle {
    /// Fire the signal. Only the first reason is kept.
    pub fn cancel(&self, reason: CancelReason) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    /// Whether the signal has already fired
    pub fn is_cancelled(&self) -> bool {
        self.sender.borrow().is_some()
    }
}

/// Receiving half of a cancellation source, optionally bounded by a deadline
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    receiver: Option<watch::Receiver<Option<CancelReason>>>,
    deadline: Option<Instant>,
}

impl CancellationSignal {
    /// A signal that never fires
    pub const fn never() -> Self {
        Self {
            receiver: None,
            deadline: None,
        }
    }

    /// Create a linked handle and signal
    pub fn pair() -> (CancellationHandle, Self) {
        let (sender, receiver) = watch::channel(None);
        (
            CancellationHandle {
                sender: Arc::new(sender),
            },
            Self {
                receiver: Some(receiver),
                deadline: None,
            },
        )
    }

    /// A signal that fires with [`CancelReason::DeadlineExceeded`] at `deadline`
    pub const fn with_deadline(deadline: Instant) -> Self {
        Self {
            receiver: None,
            deadline: Some(deadline),
        }
    }

    /// A signal that fires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Bound this signal by `deadline`, keeping the earlier of the two
    #[must_use]
    pub fn and_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// The deadline bounding this signal, if any
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Non-blocking check of whether the signal has fired
    pub fn reason(&self) -> Option<CancelReason> {
        if let Some(reason) = self
            .receiver
            .as_ref()
            .and_then(|receiver| receiver.borrow().clone())
        {
            return Some(reason);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve once the signal fires.
    ///
    /// Pends forever for a signal with neither a live handle nor a deadline.
    pub async fn cancelled(&mut self) -> CancelReason {
        let deadline = self.deadline;
        let receiver = self.receiver.as_mut();

        let explicit = async move {
            if let Some(receiver) = receiver {
                let fired = receiver
                    .wait_for(Option::is_some)
                    .await
                    .ok()
                    .and_then(|reason| reason.clone());
                if let Some(reason) = fired {
                    return reason;
                }
            }
            // Handle dropped without cancelling
            future::pending().await
        };

        let expired = async move {
            match deadline {
                Some(deadline) => {
                    time::sleep_until(deadline).await;
                    CancelReason::DeadlineExceeded
                },
                None => future::pending().await,
            }
        };

        tokio::select! {
            biased;
            reason = explicit => reason,
            reason = expired => reason,
        }
    }
}

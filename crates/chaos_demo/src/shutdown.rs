//! Shutdown handling
//!
//! Servers drain in-flight requests once a stop signal arrives, but only for a
//! bounded grace period. A request parked in a long injected delay must not
//! hold the process open.

use std::{future::Future, pin::Pin, time::Duration};

use tokio::{signal, sync::watch, time};
use tracing::{info, warn};

/// How a server run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The server stopped before any stop signal
    Exited,
    /// In-flight requests finished within the grace period
    Drained,
    /// The grace period ran out and remaining requests were dropped
    Forced,
}

/// Resolve on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("📥 Received Ctrl+C"),
        () = terminate => info!("📥 Received SIGTERM"),
    }
}

/// Run a server until `stop` fires, then give it `grace` to drain.
///
/// `serve` receives the future it should use as its own graceful-shutdown
/// trigger (`with_graceful_shutdown`, `serve_with_shutdown`). That trigger
/// resolves once `stop` fires. If draining outlasts `grace`, the server
/// future is dropped, closing whatever connections are still open.
pub async fn run_with_grace<F, Fut, E>(
    stop: impl Future<Output = ()>,
    grace: Duration,
    serve: F,
) -> Result<ShutdownOutcome, E>
where
    F: FnOnce(Pin<Box<dyn Future<Output = ()> + Send>>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let (stopping, mut stop_rx) = watch::channel(false);
    let trigger: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async move {
        // A dropped sender also counts as a stop
        let _ = stop_rx.wait_for(|stopped| *stopped).await;
    });

    let server = serve(trigger);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map(|()| ShutdownOutcome::Exited),
        () = stop => {},
    }

    info!(?grace, "Draining in-flight requests");
    stopping.send_replace(true);

    match time::timeout(grace, server).await {
        Ok(result) => result.map(|()| ShutdownOutcome::Drained),
        Err(_) => {
            warn!(?grace, "Grace period elapsed, forcing shutdown");
            Ok(ShutdownOutcome::Forced)
        },
    }
}

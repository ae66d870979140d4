//! HTTP adapter for Faultline chaos injection
//!
//! Wraps any `http`-based tower service (axum routers included) with the
//! chaos interception contract. Injected failures render as
//! `503 Service Unavailable` with a JSON body; requests canceled during
//! injected latency render as `408`/`499` with an empty body.

pub mod deadline;
pub mod error;
pub mod transport;

use axum::http::header::HeaderName;
use chaos_core::{ChaosLayer, ChaosPolicy};

pub use deadline::{RequestDeadline, RequestDeadlineLayer};
pub use error::{CHAOS_INJECTED_HEADER, CLIENT_CLOSED_REQUEST, ChaosErrorBody};
pub use transport::{HttpTransport, header_trigger_present};

/// Chaos middleware for HTTP services
pub type HttpChaosLayer = ChaosLayer<HttpTransport>;

/// Build the chaos middleware for an HTTP service
pub fn chaos_layer(policy: ChaosPolicy) -> HttpChaosLayer {
    if let Some(key) = policy.trigger() {
        if HeaderName::from_bytes(key.as_bytes()).is_err() {
            tracing::warn!(key, "chaos trigger is not a valid header name and will never match");
        }
    }
    ChaosLayer::new(policy, HttpTransport)
}

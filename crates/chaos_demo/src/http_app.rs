//! HTTP demo service

use std::time::Duration;

use axum::{Json, Router, routing::get};
use chaos_core::ChaosPolicy;
use chaos_http::{RequestDeadlineLayer, chaos_layer};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Body returned by `GET /ping`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub status: &'static str,
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong",
        status: "ok",
    })
}

/// Build the demo router.
///
/// Layer order, outermost first: tracing, optional request deadline, chaos.
pub fn create_router(policy: ChaosPolicy, request_timeout: Option<Duration>) -> Router {
    let mut router = Router::new()
        .route("/ping", get(ping))
        .layer(chaos_layer(policy));

    if let Some(timeout) = request_timeout {
        router = router.layer(RequestDeadlineLayer::new(timeout));
    }

    router.layer(TraceLayer::new_for_http())
}

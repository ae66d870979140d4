//! HTTP rendering of synthetic chaos outcomes
//!
//! Injected failures become `503` responses with a JSON body in the same
//! `{error, code}` shape as the rest of the API. Canceled requests never
//! render a success: deadline expiry maps to `408`, any other cancellation
//! to `499` (client closed request).

use axum::http::{
    HeaderValue, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderName},
};
use chaos_core::{CancelReason, InjectedFailure};
use serde::{Deserialize, Serialize};

/// Response header marking a synthetic chaos response
pub const CHAOS_INJECTED_HEADER: HeaderName = HeaderName::from_static("x-chaos-injected");

/// Non-standard status used when the client went away
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Body of an injected failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosErrorBody {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

impl From<&InjectedFailure> for ChaosErrorBody {
    fn from(failure: &InjectedFailure) -> Self {
        Self {
            error: failure.message().to_string(),
            code: failure.code().to_string(),
        }
    }
}

/// Render an injected failure as `503 Service Unavailable`
pub fn failure_response<B>(failure: &InjectedFailure) -> Response<B>
where
    B: From<String>,
{
    let body = ChaosErrorBody::from(failure);
    let json = serde_json::to_string(&body).unwrap_or_else(|_| failure.message().to_string());

    let mut response = Response::new(B::from(json));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CHAOS_INJECTED_HEADER, HeaderValue::from_static("failure"));
    response
}

/// Render a request canceled during injected latency.
///
/// The body is empty and the [`CancelReason`] is attached to the response
/// extensions.
pub fn aborted_response<B>(reason: &CancelReason) -> Response<B>
where
    B: Default,
{
    let status = match reason {
        CancelReason::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
        CancelReason::ClientDisconnected | CancelReason::Canceled(_) => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::REQUEST_TIMEOUT)
        },
    };

    let mut response = Response::new(B::default());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CHAOS_INJECTED_HEADER, HeaderValue::from_static("aborted"));
    response.extensions_mut().insert(reason.clone());
    response
}

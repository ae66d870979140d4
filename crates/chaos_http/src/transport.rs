//! HTTP transport for the chaos layer

use axum::http::{HeaderMap, Request, Response, header::HeaderName};
use chaos_core::{CancelReason, CancellationSignal, InjectedFailure, Transport};

use crate::error::{aborted_response, failure_response};

/// Translates between HTTP requests/responses and the chaos contract.
///
/// - trigger: presence of a non-empty header value (case-insensitive name)
/// - cancellation: a [`CancellationSignal`] in the request extensions, if an
///   outer layer such as [`crate::RequestDeadlineLayer`] put one there.
///   Client disconnects drop the whole future instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl<ReqBody, ResBody> Transport<Request<ReqBody>, Response<ResBody>> for HttpTransport
where
    ResBody: From<String> + Default,
{
    fn trigger_present(&self, req: &Request<ReqBody>, key: &str) -> bool {
        header_trigger_present(req.headers(), key)
    }

    fn cancellation(&self, req: &Request<ReqBody>) -> CancellationSignal {
        req.extensions()
            .get::<CancellationSignal>()
            .cloned()
            .unwrap_or_default()
    }

    fn render_failure(&self, failure: &InjectedFailure) -> Response<ResBody> {
        failure_response(failure)
    }

    fn render_aborted(&self, reason: &CancelReason) -> Response<ResBody> {
        aborted_response(reason)
    }
}

/// Whether `headers` has at least one non-empty value for `key`.
///
/// Keys that are not valid header names never match.
pub fn header_trigger_present(headers: &HeaderMap, key: &str) -> bool {
    let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
        return false;
    };
    headers.get_all(&name).iter().any(|value| !value.is_empty())
}

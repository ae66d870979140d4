//! gRPC transport for the chaos layer

use chaos_core::{CancelReason, CancellationSignal, InjectedFailure, Transport};
use http::{HeaderMap, Request, Response};
use tokio::time::Instant;
use tonic::{
    Status,
    metadata::{Ascii, Binary, MetadataKey},
};

use crate::timeout::grpc_timeout;

/// Translates between tonic's HTTP/2 requests and the chaos contract.
///
/// - trigger: presence of a non-empty metadata value for the key
/// - cancellation: the client's `grpc-timeout` deadline, combined with any
///   [`CancellationSignal`] already in the request extensions
/// - failure: `UNAVAILABLE` status
/// - abort: `DEADLINE_EXCEEDED` or `CANCELLED` status
#[derive(Debug, Clone, Copy, Default)]
pub struct GrpcTransport;

impl<ReqBody, ResBody> Transport<Request<ReqBody>, Response<ResBody>> for GrpcTransport
where
    ResBody: Default,
{
    fn trigger_present(&self, req: &Request<ReqBody>, key: &str) -> bool {
        metadata_trigger_present(req.headers(), key)
    }

    fn cancellation(&self, req: &Request<ReqBody>) -> CancellationSignal {
        let signal = req
            .extensions()
            .get::<CancellationSignal>()
            .cloned()
            .unwrap_or_default();

        match grpc_timeout(req.headers()) {
            Some(timeout) => signal.and_deadline(Instant::now() + timeout),
            None => signal,
        }
    }

    fn render_failure(&self, failure: &InjectedFailure) -> Response<ResBody> {
        Status::unavailable(failure.message()).into_http()
    }

    fn render_aborted(&self, reason: &CancelReason) -> Response<ResBody> {
        let status = match reason {
            CancelReason::DeadlineExceeded => Status::deadline_exceeded(reason.to_string()),
            CancelReason::ClientDisconnected | CancelReason::Canceled(_) => {
                Status::cancelled(reason.to_string())
            },
        };
        status.into_http()
    }
}

/// Whether the request metadata has at least one non-empty value for `key`.
///
/// Keys ending in `-bin` are looked up as binary metadata. Keys that are not
/// valid metadata keys never match.
pub fn metadata_trigger_present(headers: &HeaderMap, key: &str) -> bool {
    let present = |name: &str| headers.get_all(name).iter().any(|value| !value.is_empty());

    if is_binary_key(key) {
        MetadataKey::<Binary>::from_bytes(key.as_bytes()).is_ok_and(|key| present(key.as_str()))
    } else {
        MetadataKey::<Ascii>::from_bytes(key.as_bytes()).is_ok_and(|key| present(key.as_str()))
    }
}

/// Whether `key` can name request metadata at all
pub fn is_valid_metadata_key(key: &str) -> bool {
    if is_binary_key(key) {
        MetadataKey::<Binary>::from_bytes(key.as_bytes()).is_ok()
    } else {
        MetadataKey::<Ascii>::from_bytes(key.as_bytes()).is_ok()
    }
}

fn is_binary_key(key: &str) -> bool {
    key.get(key.len().saturating_sub(4)..)
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case("-bin"))
}

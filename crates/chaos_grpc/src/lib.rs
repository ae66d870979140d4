//! gRPC adapter for Faultline chaos injection
//!
//! Runs the chaos interception contract at the tower level of a tonic
//! server, so unary and streaming methods are covered alike:
//!
//! ```ignore
//! tonic::transport::Server::builder()
//!     .layer(chaos_grpc::chaos_layer(policy))
//!     .add_service(service)
//!     .serve(addr)
//!     .await?;
//! ```
//!
//! Injected failures surface as `UNAVAILABLE`; requests whose deadline or
//! cancellation fires during injected latency surface as
//! `DEADLINE_EXCEEDED` or `CANCELLED`.

pub mod timeout;
pub mod transport;

use chaos_core::{ChaosLayer, ChaosPolicy};

pub use timeout::{GRPC_TIMEOUT_HEADER, grpc_timeout, parse_grpc_timeout};
pub use transport::{GrpcTransport, is_valid_metadata_key, metadata_trigger_present};

/// Chaos middleware for tonic servers
pub type GrpcChaosLayer = ChaosLayer<GrpcTransport>;

/// Build the chaos middleware for a tonic server
pub fn chaos_layer(policy: ChaosPolicy) -> GrpcChaosLayer {
    if let Some(key) = policy.trigger().filter(|key| !is_valid_metadata_key(key)) {
        tracing::warn!(key, "chaos trigger is not a valid metadata key and will never match");
    }
    ChaosLayer::new(policy, GrpcTransport)
}

//! gRPC demo service

use std::{future::Future, net::SocketAddr};

use chaos_core::ChaosPolicy;
use chaos_grpc::chaos_layer;
use tonic::transport::Server;
use tonic_health::ServingStatus;

/// Serve `grpc.health.v1.Health` behind the chaos layer until `shutdown`
/// resolves.
pub async fn serve_grpc(
    addr: SocketAddr,
    policy: ChaosPolicy,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    let (reporter, health_service) = tonic_health::server::health_reporter();
    reporter
        .set_service_status("", ServingStatus::Serving)
        .await;

    Server::builder()
        .layer(chaos_layer(policy))
        .add_service(health_service)
        .serve_with_shutdown(addr, shutdown)
        .await
}

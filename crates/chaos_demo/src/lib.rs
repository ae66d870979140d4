//! Faultline demo servers
//!
//! Small HTTP and gRPC services wrapped in the chaos middleware, used to try
//! out policies from the command line.

pub mod grpc_app;
pub mod http_app;
pub mod shutdown;

pub use grpc_app::serve_grpc;
pub use http_app::{PingResponse, create_router};
pub use shutdown::{ShutdownOutcome, run_with_grace, shutdown_signal};

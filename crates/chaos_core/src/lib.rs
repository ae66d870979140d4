//! Chaos injection engine for Faultline
//!
//! Shared primitives for injecting latency and transient failures into
//! request handling, gated by an opt-in trigger signal:
//!
//! - [`ChaosPolicy`]: immutable description of what to inject
//! - [`should_apply`]: per-request trigger gate
//! - [`inject_latency`]: cancellation-aware delay
//! - [`FailureSampler`]: concurrent Bernoulli sampling
//! - [`ChaosEngine`]: the gate → delay → sample → forward contract
//! - [`ChaosLayer`]: the same contract as tower middleware, parameterized
//!   by a protocol [`Transport`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use chaos_core::{CancellationSignal, ChaosEngine, ChaosPolicy, Interception};
//!
//! # async fn example() {
//! let engine = ChaosEngine::new(
//!     ChaosPolicy::enabled()
//!         .with_trigger("x-chaos")
//!         .with_latency(Duration::from_millis(50)),
//! );
//!
//! // Trigger absent: the handler runs untouched
//! let outcome = engine
//!     .intercept(false, CancellationSignal::never(), || async { "pong" })
//!     .await;
//! assert_eq!(outcome, Interception::Forwarded("pong"));
//! # }
//! ```

pub mod cancellation;
pub mod engine;
pub mod error;
pub mod gate;
pub mod latency;
pub mod layer;
pub mod policy;
pub mod sampler;

pub use cancellation::{CancellationHandle, CancellationSignal};
pub use engine::{ChaosEngine, Interception, InterceptionStage};
pub use error::{
    CancelReason, ChaosError, INJECTED_FAILURE_CODE, INJECTED_FAILURE_MESSAGE, InjectedFailure,
    Result,
};
pub use gate::should_apply;
pub use latency::{DelayOutcome, inject_latency};
pub use layer::{ChaosLayer, ChaosService, Transport};
pub use policy::ChaosPolicy;
pub use sampler::{FailureSampler, should_fail};

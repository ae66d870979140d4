//! Per-request gating decision.

use crate::policy::ChaosPolicy;

/// Decide whether the policy applies to a request.
///
/// `trigger_present` is supplied by the transport adapter: true when the
/// request carries at least one non-empty value for the policy's trigger
/// key. Only presence matters, never the value.
pub fn should_apply(policy: &ChaosPolicy, trigger_present: bool) -> bool {
    if !policy.enabled {
        return false;
    }

    match policy.trigger() {
        Some(_) => trigger_present,
        None => true,
    }
}

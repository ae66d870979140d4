//! Probabilistic failure sampling.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Where uniform draws come from
#[derive(Debug, Clone, Default)]
enum RandomSource {
    /// One OS-seeded generator per worker thread
    #[default]
    ThreadLocal,
    /// A single seeded generator shared by all clones
    Seeded(Arc<Mutex<StdRng>>),
}

/// Bernoulli sampler deciding whether a request fails.
///
/// Cloning is cheap. Clones of a seeded sampler share one generator, so a
/// seeded run produces a single reproducible stream.
#[derive(Debug, Clone, Default)]
pub struct FailureSampler {
    source: RandomSource,
}

impl FailureSampler {
    /// Sampler backed by the thread-local generator
    pub const fn thread_local() -> Self {
        Self {
            source: RandomSource::ThreadLocal,
        }
    }

    /// Sampler backed by a deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RandomSource::Seeded(Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))),
        }
    }

    /// Decide whether to fail with probability `rate`.
    ///
    /// Rates at or below zero (and NaN) never fail; rates at or above one
    /// always fail. No randomness is consumed in either case.
    pub fn should_fail(&self, rate: f64) -> bool {
        if rate.is_nan() || rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        self.draw() < rate
    }

    /// One uniform value in [0, 1)
    fn draw(&self) -> f64 {
        match &self.source {
            RandomSource::ThreadLocal => rand::rng().random::<f64>(),
            RandomSource::Seeded(rng) => rng.lock().random::<f64>(),
        }
    }
}

/// Decide whether to fail using the thread-local generator
pub fn should_fail(rate: f64) -> bool {
    FailureSampler::thread_local().should_fail(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_fails_at_one() {
        for _ in 0..100 {
            assert!(should_fail(1.0));
        }
        assert!(should_fail(7.5));
    }

    #[test]
    fn never_fails_at_zero() {
        for _ in 0..100 {
            assert!(!should_fail(0.0));
        }
        assert!(!should_fail(-3.0));
        assert!(!should_fail(f64::NAN));
    }

    #[test]
    fn seeded_samplers_are_reproducible() {
        let a = FailureSampler::seeded(42);
        let b = FailureSampler::seeded(42);
        let left: Vec<bool> = (0..64).map(|_| a.should_fail(0.5)).collect();
        let right: Vec<bool> = (0..64).map(|_| b.should_fail(0.5)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn seeded_clones_share_one_stream() {
        let a = FailureSampler::seeded(7);
        let b = a.clone();
        let reference = FailureSampler::seeded(7);

        let interleaved: Vec<bool> = (0..32)
            .map(|i| {
                if i % 2 == 0 {
                    a.should_fail(0.5)
                } else {
                    b.should_fail(0.5)
                }
            })
            .collect();
        let sequential: Vec<bool> = (0..32).map(|_| reference.should_fail(0.5)).collect();
        assert_eq!(interleaved, sequential);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn frequency_tracks_rate() {
        const DRAWS: usize = 100_000;
        let sampler = FailureSampler::thread_local();
        let failures = (0..DRAWS).filter(|_| sampler.should_fail(0.3)).count();
        let observed = failures as f64 / DRAWS as f64;

        // Standard error is ~0.00145; 0.01 is roughly seven sigma
        assert!((observed - 0.3).abs() < 0.01, "observed {observed}");
    }
}

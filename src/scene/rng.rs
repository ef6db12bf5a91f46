use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded source for every jittered layout decision.
///
/// Production seeds from the wall clock; tests pass a fixed seed and get the
/// exact same layout back.
#[derive(Debug, Clone)]
pub struct SceneRng {
    seed: u64,
    inner: StdRng,
}

impl SceneRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_clock() -> Self {
        let now = Utc::now();
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros());
        Self::seeded(nanos.unsigned_abs())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `[lo, hi)`; a collapsed or inverted range yields `lo`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.inner.random_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform in `[-amount, amount]`.
    pub fn jitter(&mut self, amount: f64) -> f64 {
        if amount > 0.0 {
            self.inner.random_range(-amount..=amount)
        } else {
            0.0
        }
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.inner.random_bool(probability.clamp(0.0, 1.0))
    }
}

use std::time::Duration;

use crate::config::RefreshConfig;

/// Doubling retry delay for failed metric fetches, capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    base: Duration,
    max: Duration,
}

impl Backoff {
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_secs(1));
        Self {
            current: base,
            base,
            max: max.max(base),
        }
    }

    #[must_use]
    pub fn from_config(config: &RefreshConfig) -> Self {
        Self::new(
            Duration::from_secs(config.retry_base_secs),
            Duration::from_secs(config.retry_max_secs),
        )
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

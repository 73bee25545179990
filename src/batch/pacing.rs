//! Inter-record pacing.

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Sleeps `base ± jitter` seconds between generation calls, never less than the floor.
#[derive(Debug, Clone)]
pub struct Pacer {
    base: f64,
    jitter: f64,
    floor: f64,
}

impl Pacer {
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            base: config.base_interval_secs,
            jitter: config.jitter_secs.abs(),
            floor: config.min_interval_secs.max(0.0),
        }
    }

    /// Delay drawn from `rng`.
    pub fn delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let offset = if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        let secs = (self.base + offset).max(self.floor);
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }

    pub fn next_delay(&self) -> Duration {
        self.delay_with(&mut rand::thread_rng())
    }

    /// Sleep for the next delay and return it.
    pub async fn pause(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        delay
    }
}

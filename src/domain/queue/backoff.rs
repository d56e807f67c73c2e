use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Exponential retry delay with additive jitter
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::seconds(60),
            cap: Duration::hours(1),
        }
    }
}

impl BackoffPolicy {
    /// `min(cap, base * 2^(attempts - 1))` plus up to half of that again
    pub fn delay<R: Rng + ?Sized>(&self, attempts: i32, rng: &mut R) -> Duration {
        let exponent = (attempts.max(1) - 1).min(30) as u32;
        let base_ms = self.base.num_milliseconds().max(0);
        let cap_ms = self.cap.num_milliseconds().max(0);

        let delay_ms = base_ms.saturating_mul(1i64 << exponent).min(cap_ms);
        let jitter_ms = if delay_ms > 0 {
            rng.gen_range(0..=delay_ms / 2)
        } else {
            0
        };

        Duration::milliseconds(delay_ms + jitter_ms)
    }

    pub fn next_attempt_at<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        attempts: i32,
        rng: &mut R,
    ) -> DateTime<Utc> {
        now + self.delay(attempts, rng)
    }
}

//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

/// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`, capped at `max`.
///
/// `jitter_ratio` adds up to that fraction of the delay at random; the result
/// never exceeds `max`.
pub fn calculate_backoff(retry: u32, base: Duration, max: Duration, jitter_ratio: f64) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let factor = 2u32.saturating_pow(retry - 1);
    let capped = base.saturating_mul(factor).min(max);

    if jitter_ratio <= 0.0 || capped.is_zero() {
        return capped;
    }
    let jitter = rand::thread_rng().gen_range(0.0..=jitter_ratio.min(1.0));
    capped.mul_f64(1.0 + jitter).min(max)
}

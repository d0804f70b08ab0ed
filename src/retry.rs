//! Backoff policy for retrying transient failures.
//!
//! GET requests against the Parva API are idempotent, so the client retries
//! network errors and 5xx responses with exponentially increasing delays.
//! This module contains only the delay math; the retry loop itself lives in
//! [`crate::client`].

use rand::Rng;
use std::time::Duration;

/// Exponential backoff policy.
///
/// The delay before retry attempt `n` (0-indexed) is `base * 2^n`, capped
/// only by `Duration` saturation. With `jitter` enabled, each delay is
/// multiplied by a random factor in `0.5..=1.0` to spread out retries from
/// concurrent callers.
///
/// # Examples
///
/// ```
/// use parva_client::retry::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::new(Duration::from_millis(300));
///
/// assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(300));
/// assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(600));
/// assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(1200));
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    /// The delay before the first retry.
    pub base: Duration,
    /// Whether to randomize each delay to a factor in `0.5..=1.0` of its
    /// nominal value.
    pub jitter: bool,
}

impl Backoff {
    /// Creates a backoff policy with the given base delay and no jitter.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            jitter: false,
        }
    }

    /// Returns the delay before the given retry attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt.min(u32::MAX as usize) as u32);
        let delay = self
            .base
            .saturating_mul(multiplier.try_into().unwrap_or(u32::MAX));

        if self.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
            delay.mul_f64(jitter_factor)
        } else {
            delay
        }
    }
}

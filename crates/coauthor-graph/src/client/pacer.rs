//! Request pacing.
//!
//! A single-cell token bucket: after the first call, every [`Pacer::ready`]
//! waits until at least one interval has passed since the previous one.
//! Clones share the same bucket.

use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// Token-bucket pacer shared by everything that talks to one service.
#[derive(Clone, Default)]
pub struct Pacer {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    interval: Duration,
}

impl Pacer {
    /// Allow one call per `interval`. A zero interval disables pacing.
    #[must_use]
    pub fn every(interval: Duration) -> Self {
        let limiter =
            Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, interval }
    }

    /// A pacer that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Check whether calls are paced.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Minimum interval between two calls.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next slot.
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer").field("interval", &self.interval).finish()
    }
}

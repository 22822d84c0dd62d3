//! Jittered pacing of outbound API calls.
//!
//! The limiter is shared across tasks behind an `Arc`. Each caller reserves
//! the next free slot under a short lock, releases it, and only then sleeps,
//! so concurrent callers are spaced out without holding a lock across a
//! request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default fixed delay between calls.
pub const DEFAULT_BASE: Duration = Duration::from_millis(100);

/// Default random delay added on top of the base.
pub const DEFAULT_SPREAD: Duration = Duration::from_millis(500);

/// Enforces a minimum randomized delay between consecutive API calls.
#[derive(Debug)]
pub struct RateLimiter {
    base: Duration,
    spread: Duration,
    /// Earliest instant at which the next call may go out.
    next_slot: Mutex<Option<Instant>>,
    waits: AtomicU64,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_SPREAD)
    }
}

impl RateLimiter {
    pub fn new(base: Duration, spread: Duration) -> Self {
        Self {
            base,
            spread,
            next_slot: Mutex::new(None),
            waits: AtomicU64::new(0),
        }
    }

    /// A limiter that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// `base + uniform(0, spread)`.
    pub fn jittered_delay(&self) -> Duration {
        if self.spread.is_zero() {
            return self.base;
        }
        let factor: f64 = rand::thread_rng().gen_range(0.0..1.0);
        self.base + self.spread.mul_f64(factor)
    }

    /// Block until the caller may issue its next request.
    pub async fn wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        let delay = self.jittered_delay();

        let deadline = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let start = slot.map_or(now, |s| s.max(now));
            let deadline = start + delay;
            *slot = Some(deadline);
            deadline
        };

        tracing::trace!("Rate limiter sleeping until {:?}", deadline);
        tokio::time::sleep_until(deadline).await;
    }

    /// Number of times [`RateLimiter::wait`] has been called.
    pub fn wait_count(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_jitter_within_bounds() {
        let limiter = RateLimiter::new(Duration::from_millis(100), Duration::from_millis(500));
        for _ in 0..100 {
            let d = limiter.jittered_delay();
            assert!(d >= Duration::from_millis(100));
            assert!(d < Duration::from_millis(600));
        }
    }

    #[test]
    fn test_zero_spread_is_exact() {
        let limiter = RateLimiter::new(Duration::from_millis(30), Duration::ZERO);
        assert_eq!(limiter.jittered_delay(), Duration::from_millis(30));
    }

    #[test]
    fn test_disabled_limiter_returns_immediately() {
        let limiter = RateLimiter::disabled();
        let start = std::time::Instant::now();
        tokio_test::block_on(limiter.wait());
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(limiter.wait_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_sleeps_at_least_base() {
        let limiter = RateLimiter::new(Duration::from_millis(20), Duration::ZERO);
        let start = std::time::Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(limiter.wait_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_spaced() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(20), Duration::ZERO));
        let start = std::time::Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.wait().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Three reserved slots, each 20ms after the previous one.
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(limiter.wait_count(), 3);
    }
}

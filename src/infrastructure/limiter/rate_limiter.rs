use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// Capability for checking-and-incrementing a bounded per-key counter with
/// time-windowed reset. The in-memory implementation below is the default;
/// multi-instance deployments can swap in a shared store.
pub trait RateLimitStore: Send + Sync {
    fn check(&self, key: &str) -> RateDecision;

    /// Drops state for expired windows. Returns the number of entries
    /// removed; stores without eviction can keep the default.
    fn evict_expired(&self) -> usize {
        0
    }
}

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter keyed by client IP.
///
/// Bursts straddling a window boundary can reach up to twice the nominal
/// rate; that approximation is part of the contract for this form, not a
/// defect to engineer around.
pub struct FixedWindowLimiter {
    entries: DashMap<String, WindowEntry>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        FixedWindowLimiter {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }
}

impl RateLimitStore for FixedWindowLimiter {
    fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();

        // The entry guard holds the shard lock for the whole
        // read-modify-write, so concurrent checks for one IP serialize.
        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });
        let state = entry.value_mut();

        let elapsed = now.duration_since(state.window_start);
        if elapsed >= self.window {
            state.count = 1;
            state.window_start = now;
            return RateDecision::Allowed;
        }

        state.count += 1;
        if state.count <= self.max_requests {
            RateDecision::Allowed
        } else {
            RateDecision::Limited {
                retry_after: self.window - elapsed,
            }
        }
    }

    fn evict_expired(&self) -> usize {
        let before = self.entries.len();
        let window = self.window;
        self.entries
            .retain(|_, state| state.window_start.elapsed() < window);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = FixedWindowLimiter::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            assert!(limiter.check("203.0.113.7").is_allowed());
        }
    }

    #[test]
    fn denies_beyond_the_limit_within_a_window() {
        let limiter = FixedWindowLimiter::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            assert!(limiter.check("203.0.113.7").is_allowed());
        }
        match limiter.check("203.0.113.7") {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
            }
            RateDecision::Allowed => panic!("11th request must be denied"),
        }
        // Still denied; the counter keeps climbing past the limit.
        assert!(!limiter.check("203.0.113.7").is_allowed());
    }

    #[test]
    fn window_rollover_resets_the_counter() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_millis(40));

        assert!(limiter.check("198.51.100.2").is_allowed());
        assert!(limiter.check("198.51.100.2").is_allowed());
        assert!(!limiter.check("198.51.100.2").is_allowed());

        std::thread::sleep(Duration::from_millis(50));

        assert!(limiter.check("198.51.100.2").is_allowed());
        assert!(limiter.check("198.51.100.2").is_allowed());
        assert!(!limiter.check("198.51.100.2").is_allowed());
    }

    #[test]
    fn keys_are_tracked_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("203.0.113.7").is_allowed());
        assert!(!limiter.check("203.0.113.7").is_allowed());
        assert!(limiter.check("203.0.113.8").is_allowed());
    }

    #[test]
    fn eviction_removes_only_expired_windows() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_millis(40));

        limiter.check("203.0.113.7");
        std::thread::sleep(Duration::from_millis(50));
        limiter.check("203.0.113.8");

        assert_eq!(limiter.evict_expired(), 1);
        assert_eq!(limiter.entries.len(), 1);
    }
}

// crates/corpdb-core/src/limit.rs

//! # Rate Limiter
//!
//! Per-identity query counters over a rolling window. The window starts
//! at an identity's first query of the current cycle, not at a calendar
//! day boundary.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Queries left in the current window after this one.
    pub remaining: u32,
}

struct Entry {
    count: u32,
    window_start: Instant,
}

/// Rolling-window counter keyed by caller identity.
pub struct RateLimiter {
    window: Duration,
    cap: u32,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RateLimiter {
    pub fn new(window: Duration, cap: u32) -> Self {
        Self {
            window,
            cap,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one query against `identity` and reports the verdict.
    ///
    /// Increment-or-reset runs under the map lock, so concurrent queries
    /// from the same identity cannot lose updates. A denied check does
    /// not extend or restart the window.
    pub fn check(&self, identity: &str) -> Decision {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = entries.entry(identity.to_string()).or_insert(Entry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.cap {
            return Decision {
                allowed: false,
                remaining: 0,
            };
        }

        entry.count += 1;
        Decision {
            allowed: true,
            remaining: self.cap - entry.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_query_leaves_cap_minus_one() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 10);
        let d = limiter.check("1.2.3.4");
        assert!(d.allowed);
        assert_eq!(d.remaining, 9);
    }

    #[test]
    fn eleventh_query_is_denied() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 10);
        for i in 0..10 {
            let d = limiter.check("1.2.3.4");
            assert!(d.allowed);
            assert_eq!(d.remaining, 9 - i);
        }
        let d = limiter.check("1.2.3.4");
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
    }

    #[test]
    fn identities_are_tracked_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);
        assert!(limiter.check("b").allowed);
    }

    #[test]
    fn window_elapse_starts_a_fresh_cycle() {
        let limiter = RateLimiter::new(Duration::from_millis(30), 2);
        assert!(limiter.check("a").allowed);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);

        thread::sleep(Duration::from_millis(40));
        let d = limiter.check("a");
        assert!(d.allowed);
        assert_eq!(d.remaining, 1);
    }

    #[test]
    fn concurrent_checks_do_not_lose_counts() {
        let limiter = std::sync::Arc::new(RateLimiter::new(Duration::from_secs(60), 100));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = std::sync::Arc::clone(&limiter);
                thread::spawn(move || {
                    for _ in 0..10 {
                        limiter.check("shared");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // All 100 queries were counted: the next one is denied.
        assert!(!limiter.check("shared").allowed);
    }
}

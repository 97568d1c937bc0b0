//! # Requeue backoff
//!
//! Decides how long a failing `ClusterSync` waits before the controller
//! retries it. Two limits apply and the later one wins:
//!
//! - [`ItemBackoff`]: per-key exponential backoff, `base * 2^failures`,
//!   capped at `max`. Cleared with `forget` after a successful pass. Keys
//!   whose retry was due more than `max` ago are dropped, which covers
//!   objects deleted while failing.
//! - [`TokenBucket`]: global rate limit shared by every key. `burst` retries
//!   go through immediately, after that slots open at `qps` per second.
//!
//! Sequence for base 5ms, max 1000s: 5ms, 10ms, 20ms, 40ms, ... 1000s (max).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Failures {
    count: u32,
    retry_at: Instant,
}

/// Per-key exponential backoff
#[derive(Debug)]
pub struct ItemBackoff {
    base: Duration,
    max: Duration,
    failures: Mutex<HashMap<String, Failures>>,
}

impl ItemBackoff {
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Records a failure for `key` and returns how long it should wait
    pub fn when(&self, key: &str) -> Duration {
        self.when_at(key, Instant::now())
    }

    pub fn when_at(&self, key: &str, now: Instant) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        failures.retain(|_, f| now.saturating_duration_since(f.retry_at) <= self.max);

        let entry = failures.entry(key.to_string()).or_insert(Failures {
            count: 0,
            retry_at: now,
        });
        let delay = self.delay_for(entry.count);
        entry.count = entry.count.saturating_add(1);
        entry.retry_at = now + delay;
        delay
    }

    /// Clears the failure history of `key`
    pub fn forget(&self, key: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Number of consecutive failures recorded for `key`
    pub fn failures(&self, key: &str) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, |f| f.count)
    }

    /// Stateless delay for the n-th consecutive failure (0-indexed)
    #[must_use]
    pub fn delay_for(&self, failures: u32) -> Duration {
        2u32.checked_pow(failures)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Global token bucket handing out retry slots
///
/// Reservations always succeed; the returned delay says how long the caller
/// has to wait for its slot. Tokens go negative while slots are reserved
/// ahead of time.
#[derive(Debug)]
pub struct TokenBucket {
    burst: f64,
    qps: f64,
    bucket: Mutex<Bucket>,
}

impl TokenBucket {
    #[must_use]
    pub fn new(burst: u32, qps: f64) -> Self {
        Self {
            burst: f64::from(burst),
            qps,
            bucket: Mutex::new(Bucket {
                tokens: f64::from(burst),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Reserves the next slot and returns the wait until it opens
    pub fn reserve(&self) -> Duration {
        self.reserve_at(Instant::now())
    }

    pub fn reserve_at(&self, now: Instant) -> Duration {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.qps).min(self.burst);
        bucket.tokens -= 1.0;
        if bucket.tokens >= 0.0 || self.qps <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-bucket.tokens / self.qps)
        }
    }
}

/// Combined requeue policy used by the controller's error policy
#[derive(Debug)]
pub struct RequeuePolicy {
    items: ItemBackoff,
    bucket: TokenBucket,
}

impl RequeuePolicy {
    #[must_use]
    pub fn new(items: ItemBackoff, bucket: TokenBucket) -> Self {
        Self { items, bucket }
    }

    /// Records a failure for `key`; the delay is the later of its own backoff
    /// and the next global slot
    pub fn when(&self, key: &str) -> Duration {
        self.items.when(key).max(self.bucket.reserve())
    }

    pub fn forget(&self, key: &str) {
        self.items.forget(key);
    }

    pub fn failures(&self, key: &str) -> u32 {
        self.items.failures(key)
    }
}

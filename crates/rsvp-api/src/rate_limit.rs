use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Windows are pruned once the map grows past this many clients.
const PRUNE_THRESHOLD: usize = 1024;

/// Fixed-window limiter keyed by client address.
///
/// Requests without a known peer address share a single bucket.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    buckets: Mutex<HashMap<Option<IpAddr>, Window>>,
}

struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Limiting is switched off.
    Unlimited,
    Allowed { remaining: u32, reset: Duration },
    Limited { retry_after: Duration },
}

impl RateLimiter {
    /// A `limit` of zero disables limiting.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, client: Option<IpAddr>) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: Option<IpAddr>, now: Instant) -> Decision {
        if self.limit == 0 {
            return Decision::Unlimited;
        }

        // Counters stay usable even if a holder panicked
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());

        if buckets.len() > PRUNE_THRESHOLD {
            let window = self.window;
            buckets.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = buckets.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        let reset = self
            .window
            .saturating_sub(now.duration_since(entry.started));

        if entry.count >= self.limit {
            return Decision::Limited { retry_after: reset };
        }

        entry.count += 1;
        Decision::Allowed {
            remaining: self.limit - entry.count,
            reset,
        }
    }
}

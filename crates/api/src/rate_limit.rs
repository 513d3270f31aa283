use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct IpRateLimiter {
    inner: Arc<Mutex<Buckets>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug)]
struct Buckets {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl IpRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Buckets {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            window,
            max_requests,
        }
    }

    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Number of clients currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.inner.lock().hits.len()
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self.inner.lock();

        // Idle clients are dropped once per window so the map only holds live keys.
        if now.saturating_duration_since(buckets.last_sweep) > self.window {
            let window = self.window;
            buckets.hits.retain(|_, queue| {
                queue
                    .back()
                    .is_some_and(|last| now.saturating_duration_since(*last) <= window)
            });
            buckets.last_sweep = now;
        }

        let queue = buckets.hits.entry(key.to_string()).or_default();
        while queue
            .front()
            .is_some_and(|first| now.saturating_duration_since(*first) > self.window)
        {
            queue.pop_front();
        }

        if queue.len() >= self.max_requests {
            return false;
        }

        queue.push_back(now);
        true
    }
}

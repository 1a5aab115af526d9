//! Request pacing.
//!
//! Upstream APIs are public and free; the pipeline's only concession to them
//! is a fixed minimum interval between consecutive requests to the same host.
//! The policy lives here as its own type, independent of any transport, so a
//! token bucket could replace it later without touching the collectors.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Minimum inter-request interval for one upstream host.
///
/// Each source client owns one pacer. `pause` blocks until the interval has
/// elapsed since the previous request, then stamps the current one.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until `min_interval` has passed since the previous request.
    ///
    /// The first call never sleeps.
    pub fn pause(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_not_delayed() {
        let pacer = RequestPacer::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.pause();
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn consecutive_requests_respect_min_interval() {
        let pacer = RequestPacer::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.pause();
        pacer.pause();
        pacer.pause();
        // Two enforced gaps after the free first call.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn zero_interval_never_sleeps() {
        let pacer = RequestPacer::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.pause();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}

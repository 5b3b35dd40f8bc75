//! Minimum spacing between outbound requests, shared by all callers

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

pub struct Throttle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until a request may be sent.
    ///
    /// The lock is held while sleeping, so concurrent callers are released one
    /// interval apart in arrival order. Returns the release instant.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        let now = Instant::now();
        *last = Some(now);
        now
    }
}

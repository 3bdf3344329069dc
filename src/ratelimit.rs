use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Enforces a minimum pause between successive requests to one remote
/// endpoint.
///
/// Holds the single shared last-request timestamp for the process; the crawl
/// loop is strictly sequential, so one owner suffices and no further
/// synchronization is needed.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspends the caller until at least `interval` has elapsed since the
    /// previous call returned. The first call returns immediately, as does
    /// any call made after the interval has already passed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn back_to_back_calls_are_spaced() {
        let interval = Duration::from_millis(200);
        let mut limiter = RateLimiter::new(interval);

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        assert!(start.elapsed() >= interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_incur_no_delay() {
        let interval = Duration::from_millis(200);
        let mut limiter = RateLimiter::new(interval);

        limiter.wait().await;
        tokio::time::advance(Duration::from_millis(500)).await;

        let start = Instant::now();
        limiter.wait().await;
        // the paused clock only advances while sleeping, so any sleep at all
        // would show up here
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn first_call_returns_immediately() {
        let mut limiter = RateLimiter::new(Duration::from_secs(10));
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

//! Per-service request spacing
//!
//! EDHREC and Scryfall both ask clients to keep request rates modest. The
//! limiter enforces a minimum wall-clock gap between consecutive requests to
//! each service, shared by every concurrent worker in the process.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Minimum gap between EDHREC requests
const EDHREC_MIN_DELAY: Duration = Duration::from_millis(800);
/// Scryfall asks for 50-100ms between requests; stay above that
const SCRYFALL_MIN_DELAY: Duration = Duration::from_millis(120);

/// Upstream services with independent spacing requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Homepage, deck index and deck detail requests
    Edhrec,
    /// Card metadata requests
    Scryfall,
}

/// Tracks the last grant for one service. The mutex is held across the
/// deficit sleep, so concurrent callers are granted one at a time and
/// consecutive grants are at least `min_delay` apart.
struct Gate {
    min_delay: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl Gate {
    fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_grant: Mutex::new(None),
        }
    }

    async fn acquire(&self) {
        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Enforces minimum spacing between requests, per service
pub struct RateLimiter {
    edhrec: Gate,
    scryfall: Gate,
}

impl RateLimiter {
    /// Limiter with the production delays
    pub fn new() -> Self {
        Self::with_delays(EDHREC_MIN_DELAY, SCRYFALL_MIN_DELAY)
    }

    /// Limiter with custom delays; tests use short ones
    pub fn with_delays(edhrec: Duration, scryfall: Duration) -> Self {
        Self {
            edhrec: Gate::new(edhrec),
            scryfall: Gate::new(scryfall),
        }
    }

    /// Wait until a request to `service` is allowed, then record the grant.
    /// The first request per service goes through immediately.
    pub async fn acquire(&self, service: Service) {
        match service {
            Service::Edhrec => self.edhrec.acquire().await,
            Service::Scryfall => self.scryfall.acquire().await,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_acquire_is_immediate() {
        tokio_test::block_on(async {
            let limiter = RateLimiter::with_delays(
                Duration::from_millis(200),
                Duration::from_millis(200),
            );
            let start = Instant::now();
            limiter.acquire(Service::Edhrec).await;
            assert!(start.elapsed() < Duration::from_millis(100));
        });
    }

    #[test]
    fn test_sequential_acquires_are_spaced() {
        tokio_test::block_on(async {
            let limiter = RateLimiter::with_delays(
                Duration::from_millis(50),
                Duration::from_millis(50),
            );
            let start = Instant::now();
            limiter.acquire(Service::Scryfall).await;
            limiter.acquire(Service::Scryfall).await;
            limiter.acquire(Service::Scryfall).await;
            // First is free, the next two wait ~50ms each
            assert!(start.elapsed() >= Duration::from_millis(100));
        });
    }

    #[test]
    fn test_services_do_not_block_each_other() {
        tokio_test::block_on(async {
            let limiter = RateLimiter::with_delays(
                Duration::from_millis(500),
                Duration::from_millis(500),
            );
            limiter.acquire(Service::Edhrec).await;
            let start = Instant::now();
            limiter.acquire(Service::Scryfall).await;
            assert!(start.elapsed() < Duration::from_millis(100));
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_acquires_are_serialized() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::with_delays(
            Duration::from_millis(30),
            Duration::from_millis(30),
        ));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire(Service::Edhrec).await;
                Instant::now()
            }));
        }

        let mut grants = Vec::new();
        for handle in handles {
            grants.push(handle.await.unwrap());
        }
        grants.sort();

        for pair in grants.windows(2) {
            // Small tolerance for timer coarseness
            assert!(
                pair[1].duration_since(pair[0]) >= Duration::from_millis(25),
                "grants closer than the configured delay"
            );
        }
    }
}

//! Cached liveness result for the analysis service.
//!
//! A probe result, healthy or not, is reused for the cache TTL so repeated
//! submissions inside the window do not re-probe the service.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::DEFAULT_HEALTH_TTL;

#[derive(Debug, Clone, Copy)]
struct HealthSnapshot {
    checked_at: Instant,
    healthy: bool,
}

/// Last liveness probe result with a time-to-live.
#[derive(Debug)]
pub struct HealthCache {
    ttl: Duration,
    last: Mutex<Option<HealthSnapshot>>,
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_TTL)
    }
}

impl HealthCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached result, if one was recorded less than `ttl` ago.
    pub fn get(&self) -> Option<bool> {
        let last = *self.last.lock().unwrap_or_else(|e| e.into_inner());
        last.filter(|s| s.checked_at.elapsed() < self.ttl)
            .map(|s| s.healthy)
    }

    /// Store a fresh probe result.
    pub fn record(&self, healthy: bool) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        *last = Some(HealthSnapshot {
            checked_at: Instant::now(),
            healthy,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_empty_cache() {
        let cache = HealthCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(30));
        assert_eq!(cache.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_within_ttl() {
        let cache = HealthCache::new(Duration::from_secs(30));
        cache.record(true);
        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get(), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_result_is_cached() {
        let cache = HealthCache::new(Duration::from_secs(30));
        cache.record(false);
        assert_eq!(cache.get(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let cache = HealthCache::new(Duration::from_secs(30));
        cache.record(true);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get(), None);
    }
}

//! Caching decorator for rate providers.

use crate::cache::{Cache, RATE_TTL};
use crate::rate_provider::RateProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Wraps a [`RateProvider`] with a TTL cache. The fetch lock is held across
/// the inner request, so concurrent callers asking for the same pair
/// coalesce into a single upstream fetch; the rest are served from cache.
///
/// Failures are propagated, never cached: a transient network error must
/// not be pinned for the full freshness window.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    cache: Arc<dyn Cache<String, f64>>,
    fetch_lock: Mutex<()>,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, cache: Arc<dyn Cache<String, f64>>) -> Self {
        Self {
            inner,
            cache,
            fetch_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<T: RateProvider + Send + Sync> RateProvider for CachingRateProvider<T> {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let key = format!("{}-{}", from.to_lowercase(), to.to_lowercase());
        if let Some(rate) = self.cache.get(&key).await {
            debug!("Cache hit for currency rate: {}", key);
            return Ok(rate);
        }

        let _guard = self.fetch_lock.lock().await;
        // A concurrent caller may have fetched while we waited.
        if let Some(rate) = self.cache.get(&key).await {
            debug!("Cache hit for currency rate after wait: {}", key);
            return Ok(rate);
        }

        debug!("Cache miss for currency rate: {}", key);
        let rate = self.inner.get_rate(from, to).await?;
        self.cache.put(key, rate, Some(RATE_TTL)).await;
        Ok(rate)
    }
}

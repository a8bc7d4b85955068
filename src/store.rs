//! Persistent rate cache backed by a fjall keyspace.
//!
//! Entries carry their own expiry timestamp so the freshness window
//! survives process restarts; an expired entry is purged on read.

use crate::cache::Cache;
use crate::config::AppConfig;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct StoredEntry<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

pub struct FjallCache<V>
where
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    _keyspace: Keyspace,
    partition: PartitionHandle,
    _marker: PhantomData<V>,
}

impl<V> FjallCache<V>
where
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn open(path: &Path, partition_name: &str) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let keyspace = fjall::Config::new(path).open()?;
        let partition =
            keyspace.open_partition(partition_name, PartitionCreateOptions::default())?;
        Ok(Self {
            _keyspace: keyspace,
            partition,
            _marker: PhantomData,
        })
    }

    /// Opens the rate partition under the user's cache directory.
    pub fn open_default() -> Result<Self> {
        let path = AppConfig::default_cache_path()?;
        Self::open(&path, "rates")
    }
}

#[async_trait]
impl<V> Cache<String, V> for FjallCache<V>
where
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn get(&self, key: &String) -> Option<V> {
        let res: Result<Option<V>> = (|| {
            if let Some(bytes) = self.partition.get(key.as_bytes())? {
                let entry: StoredEntry<V> = serde_json::from_slice(&bytes)?;
                if let Some(expires_at) = entry.expires_at
                    && Utc::now() > expires_at
                {
                    debug!("Cache entry expired for key: {key}");
                    self.partition.remove(key.as_bytes())?;
                    return Ok(None);
                }
                debug!("Cache HIT for key: {key}");
                return Ok(Some(entry.value));
            }
            debug!("Cache MISS for key: {key}");
            Ok(None)
        })();

        // Storage failures degrade to a miss; the caller re-fetches.
        match res {
            Ok(value) => value,
            Err(e) => {
                debug!("Rate store get error: {e}");
                None
            }
        }
    }

    async fn put(&self, key: String, value: V, ttl: Option<Duration>) {
        let res: Result<()> = (|| {
            let expires_at = ttl.and_then(|d| {
                chrono::Duration::from_std(d)
                    .ok()
                    .map(|d| Utc::now() + d)
            });
            let entry = StoredEntry { value, expires_at };
            self.partition
                .insert(key.as_bytes(), serde_json::to_vec(&entry)?)?;
            debug!("Cache PUT for key: {key}");
            Ok(())
        })();
        if let Err(e) = res {
            debug!("Rate store put error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_fjall_cache_get_put() {
        let dir = tempdir().unwrap();
        let cache = FjallCache::<f64>::open(dir.path(), "rates").unwrap();

        assert!(cache.get(&"usd-eur".to_string()).await.is_none());

        cache.put("usd-eur".to_string(), 0.92, None).await;
        assert_eq!(cache.get(&"usd-eur".to_string()).await, Some(0.92));

        assert!(cache.get(&"usd-gbp".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_fjall_cache_ttl_expiration() {
        let dir = tempdir().unwrap();
        let cache = FjallCache::<f64>::open(dir.path(), "rates").unwrap();

        cache
            .put("usd-eur".to_string(), 0.92, Some(Duration::from_millis(10)))
            .await;
        assert_eq!(cache.get(&"usd-eur".to_string()).await, Some(0.92));

        sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&"usd-eur".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_rates_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let cache = FjallCache::<f64>::open(dir.path(), "rates").unwrap();
            cache.put("usd-eur".to_string(), 0.92, None).await;
        }

        let cache = FjallCache::<f64>::open(dir.path(), "rates").unwrap();
        assert_eq!(cache.get(&"usd-eur".to_string()).await, Some(0.92));
    }
}

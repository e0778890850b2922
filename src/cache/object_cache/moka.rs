use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 按条目记录的过期时间
struct EntryExpiry;

impl Expiry<String, (String, Duration)> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &(String, Duration),
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, (String, Duration)>,
    default_ttl: u64,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Self { inner, default_ttl }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some((value, _)) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let effective_ttl = if ttl == 0 { self.default_ttl } else { ttl };
        self.inner
            .insert(key, (value, Duration::from_secs(effective_ttl)))
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_raw("k".into(), "v".into(), 0).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));
        cache.insert_json("n".into(), &vec![1, 2, 3], 30).await;
        assert_eq!(cache.get_json::<Vec<i32>>("n").await, Some(vec![1, 2, 3]));

        // 类型不符时清除旧值
        assert_eq!(cache.get_json::<String>("n").await, None);
        assert_eq!(cache.get_raw("n").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_raw("short".into(), "v".into(), 1).await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }
}

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// 共享 Redis 缓存，多实例部署时用户档案与统计数据在实例间一致
pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时探测一次，失败则由启动流程回退到内存缓存
        let mut conn = client.get_connection().map_err(|e| {
            error!("Cannot reach Redis at {}: {}", redis_config.url, e);
            format!("Redis connection failed: {e}")
        })?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "Redis cache ready ({}), prefix '{}', default TTL {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn effective_ttl(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = self.effective_ttl(ttl);
        if let Err(e) = conn
            .set_ex::<String, String, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        } else {
            debug!("Cached {} for {}s", key, ttl);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        match conn.del::<String, i32>(self.make_key(key)).await {
            Ok(deleted) => debug!("Removed cache key {} ({} deleted)", key, deleted),
            Err(e) => error!("Failed to remove key '{}': {}", key, e),
        }
    }

    /// 只清除本服务前缀下的键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await
        {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to list keys for '{}': {}", pattern, e);
                return;
            }
        };

        if keys.is_empty() {
            return;
        }
        match conn.del::<Vec<String>, i32>(keys).await {
            Ok(deleted) => debug!("Invalidated {} cache keys under '{}'", deleted, pattern),
            Err(e) => error!("Failed to invalidate keys under '{}': {}", pattern, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_cache() -> RedisObjectCache {
        // 打开客户端不会建立连接
        RedisObjectCache {
            client: redis::Client::open("redis://127.0.0.1:6379").unwrap(),
            key_prefix: "lms:".to_string(),
            default_ttl: 300,
        }
    }

    #[test]
    fn test_make_key_uses_prefix() {
        assert_eq!(offline_cache().make_key("user:1"), "lms:user:1");
    }

    #[test]
    fn test_zero_ttl_uses_default() {
        let cache = offline_cache();
        assert_eq!(cache.effective_ttl(0), 300);
        assert_eq!(cache.effective_ttl(30), 30);
    }
}

//! 对象缓存
//!
//! 后端以插件形式注册（`moka` 内存缓存、`redis`），启动时按配置选择。
//! 值统一以 JSON 字符串存储。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认过期时间（秒）
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取并反序列化，格式不符的旧值会被清除
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Dropping undecodable cache entry {}: {}", key, e);
                    self.remove(key).await;
                    None
                }
            },
            _ => None,
        }
    }

    pub async fn insert_json<T: Serialize>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.insert_raw(key, json, ttl).await,
            Err(e) => debug!("Skipping cache insert for {}: {}", key, e),
        }
    }
}

/// 声明缓存插件，生成 `register()` 供启动时调用
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub const PLUGIN_NAME: &str = $name;

        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                PLUGIN_NAME,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::LmsError::cache_connection)?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::LmsError>(
                            Box::new(cache),
                        )
                    })
                }),
            );
        }
    };
}

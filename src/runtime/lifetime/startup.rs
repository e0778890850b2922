use crate::cache::ObjectCache;
use crate::cache::register::{
    debug_object_cache_registry, get_object_cache_plugin, register_builtin_plugins,
};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn try_cache_plugin(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = try_cache_plugin(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache backend");
        if let Some(cache) = try_cache_plugin("moka").await {
            return Ok(cache);
        }
    }

    Err(LmsError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 空库时创建管理员档案
///
/// 登录由外部认证服务负责，这里只签发一枚短期令牌方便首次配置。
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin profile...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
        role: UserRole::Admin,
        full_name: Some("Administrator".to_string()),
        phone: None,
        avatar_url: None,
        class_rate: None,
    };

    let user = match storage.create_user(admin_request).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed to create admin profile: {}", e);
            return;
        }
    };

    info!(
        "Default admin profile created (ID: {}, username: {})",
        user.id, user.username
    );

    match JwtUtils::generate_access_token(user.id, UserRole::ADMIN) {
        Ok(token) => {
            warn!("==========================================================");
            warn!(
                "  BOOTSTRAP ADMIN TOKEN (expires in {} minutes)",
                AppConfig::get().jwt.access_token_expiry
            );
            warn!("  {}", token);
            warn!("==========================================================");
        }
        Err(e) => warn!("Failed to issue bootstrap admin token: {}", e),
    }
}

/// 准备服务器启动的上下文：存储、缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    register_builtin_plugins();
    if cfg!(debug_assertions) {
        debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

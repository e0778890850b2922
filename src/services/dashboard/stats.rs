use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::debug;

use super::DashboardService;
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::dashboard::DashboardStats;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{cache_from_request, error_response};
use crate::storage::Storage;

pub const STATS_CACHE_KEY: &str = "dashboard:stats";

/// 冷却时间内直接返回缓存的统计结果
pub(crate) async fn cached_stats(
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
    cooldown_secs: u64,
) -> Result<DashboardStats> {
    if let Some(stats) = cache.get_json::<DashboardStats>(STATS_CACHE_KEY).await {
        debug!("Dashboard stats served from cache");
        return Ok(stats);
    }

    let stats = storage.get_dashboard_stats().await?;
    if cooldown_secs > 0 {
        cache
            .insert_json(STATS_CACHE_KEY.to_string(), &stats, cooldown_secs)
            .await;
    }
    Ok(stats)
}

pub async fn get_stats(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = cache_from_request(request)?;

    match cached_stats(
        &storage,
        &cache,
        AppConfig::get().dashboard.stats_cooldown_secs,
    )
    .await
    {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard stats retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_stats_cooldown() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));

        let first = cached_stats(&storage, &cache, 60).await.unwrap();
        assert_eq!(first.course_count, 0);

        storage
            .create_course(CreateCourseRequest {
                title: "Violin".to_string(),
                description: None,
                level: None,
                price: None,
                duration_weeks: None,
                teacher_id: None,
                is_published: None,
            })
            .await
            .unwrap();

        // 冷却期内返回旧结果
        let second = cached_stats(&storage, &cache, 60).await.unwrap();
        assert_eq!(second.course_count, 0);
        assert_eq!(second.generated_at, first.generated_at);

        cache.remove(STATS_CACHE_KEY).await;
        let third = cached_stats(&storage, &cache, 60).await.unwrap();
        assert_eq!(third.course_count, 1);
    }
}

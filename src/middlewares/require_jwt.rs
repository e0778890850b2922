/*!
 * JWT 认证中间件
 *
 * 令牌由外部认证服务签发（HS256，共享密钥），此中间件只负责校验并加载用户档案。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/courses")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_courses)),
 * );
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user_claims(&req)` 取得当前用户。
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中携带 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验签名、过期时间与 `token_type`
 * 3. 按 `sub` 加载用户档案（先查缓存，再查存储），非 active 用户拒绝访问
 * 4. 用户信息写入请求扩展，继续处理请求
 */

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 用户档案缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 从 `Authorization` 头取出 bearer token
pub(crate) fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 提取并验证 JWT，加载用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, String> {
    let token = bearer_token(
        req.headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|h| h.to_str().ok()),
    )
    .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let cache_key = user_cache_key(user_id);
    if let Some(user) = cache.get_json::<User>(&cache_key).await {
        return ensure_active(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {} from storage: {}", user_id, e);
            "Failed to retrieve user from storage".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    if let Err(e) = storage.update_last_seen(user_id).await {
        debug!("Failed to update last_seen for user {}: {}", user_id, e);
    }

    cache
        .insert_json(cache_key, &user, AppConfig::get().cache.default_ttl)
        .await;

    ensure_active(user)
}

fn ensure_active(user: User) -> Result<User, String> {
    if !user.is_active() {
        return Err("User is not active".to_string());
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户，需在 RequireJWT 之后使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn test_user_cache_key() {
        assert_eq!(user_cache_key(42), "user:42");
    }
}

/*!
 * 固定窗口速率限制
 *
 * 用于无需登录的公开端点（官网咨询表单、课程目录）。
 * 计数键为 `前缀:标识:窗口序号`，窗口序号 = 当前 unix 秒 / 窗口长度，
 * 因此每个窗口独立计数，到期后整体清零。
 *
 * ```rust,ignore
 * web::scope("/api/v1/public/inquiries")
 *     .wrap(RateLimit::inquiry())  // 5次/分钟/IP
 *     .route("", web::post().to(create_inquiry))
 * ```
 *
 * 超过限制返回 429，并带 `Retry-After`（距窗口结束的秒数）。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 窗口长度上限，计数缓存按此过期
const MAX_WINDOW_SECS: u64 = 3600;

/// 全局计数缓存，键: 前缀:标识:窗口序号，值: 窗口内请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

/// 速率限制策略
#[derive(Clone, Debug)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    /// `window_secs` 取值范围 1..=3600
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀，用于区分不同端点
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 官网咨询表单：5次/分钟/IP
    pub fn inquiry() -> Self {
        Self::new(5, 60).with_prefix("inquiry")
    }

    /// 公开课程目录：60次/分钟/IP
    pub fn public_catalog() -> Self {
        Self::new(60, 60).with_prefix("catalog")
    }

    /// 当前窗口序号及距窗口结束的秒数
    fn window_at(&self, now_secs: u64) -> (u64, u64) {
        let index = now_secs / self.window_secs;
        let remaining = self.window_secs - now_secs % self.window_secs;
        (index, remaining)
    }

    /// 限制键：已认证用户按用户 ID，否则按 IP
    fn cache_key(&self, user_id: Option<i64>, client_ip: &str, window: u64) -> String {
        let identifier = user_id
            .map(|id| format!("user:{id}"))
            .unwrap_or_else(|| format!("ip:{client_ip}"));
        if self.key_prefix.is_empty() {
            format!("{identifier}:{window}")
        } else {
            format!("{}:{}:{}", self.key_prefix, identifier, window)
        }
    }
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 的第一个地址、X-Real-IP
///
/// 部署在反向代理后时，代理需要正确设置转发头。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

/// 已认证请求的用户 ID
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let policy = self.policy.clone();
        let max_requests = policy.max_requests;

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window, retry_after) = policy.window_at(now);
            let cache_key =
                policy.cache_key(extract_user_id(&req), &extract_client_ip(&req), window);

            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);
            if current_count >= max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, max_requests
                );
                return Ok(req
                    .into_response(create_rate_limit_response(retry_after).map_into_right_body()));
            }

            RATE_LIMIT_CACHE
                .insert(cache_key.clone(), current_count + 1)
                .await;

            let remaining = max_requests.saturating_sub(current_count + 1);
            let mut res = srv.call(req).await?.map_into_left_body();
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let inquiry = RateLimit::inquiry();
        assert_eq!(inquiry.max_requests, 5);
        assert_eq!(inquiry.window_secs, 60);
        assert_eq!(inquiry.key_prefix, "inquiry");

        assert_eq!(RateLimit::public_catalog().max_requests, 60);
        assert_eq!(RateLimit::new(1, 0).window_secs, 1);
        assert_eq!(RateLimit::new(1, 86_400).window_secs, MAX_WINDOW_SECS);
    }

    #[test]
    fn test_fixed_window() {
        let limit = RateLimit::inquiry();
        assert_eq!(limit.window_at(120), (2, 60));
        assert_eq!(limit.window_at(179), (2, 1));
        // 跨过窗口边界后换一个计数键
        assert_eq!(limit.window_at(180), (3, 60));
    }

    #[test]
    fn test_cache_key_prefers_user() {
        let limit = RateLimit::inquiry();
        assert_eq!(limit.cache_key(Some(7), "10.0.0.1", 3), "inquiry:user:7:3");
        assert_eq!(limit.cache_key(None, "10.0.0.1", 3), "inquiry:ip:10.0.0.1:3");
        assert_eq!(RateLimit::new(1, 1).cache_key(None, "::1", 0), "ip:::1:0");
    }

    #[actix_web::test]
    async fn test_limit_returns_429() {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new().service(
                web::scope("/limited")
                    .wrap(RateLimit::new(2, 3600).with_prefix("test-429"))
                    .route("", web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/limited")
                .peer_addr("192.0.2.10:5000".parse().unwrap())
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }
}

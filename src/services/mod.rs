pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod inquiries;
pub mod payments;
pub mod salaries;
pub mod users;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use calendar::CalendarService;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use inquiries::InquiryService;
pub use payments::PaymentService;
pub use salaries::SalaryService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error::InternalError, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app_data 取存储，未注册时返回 500
pub(crate) fn storage_from_request(
    fixed: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> ActixResult<Arc<dyn Storage>> {
    if let Some(storage) = fixed {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| internal("Storage not found in app data"))
}

/// 从 app_data 取对象缓存
pub(crate) fn cache_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| internal("Cache not found in app data"))
}

/// 当前登录用户，必须位于 RequireJWT 之后
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        let response = HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ));
        InternalError::from_response("Authentication required", response).into()
    })
}

/// 把业务错误映射为响应；存储层错误使用 `fallback` 并记录日志
pub(crate) fn error_response(err: &LmsError, fallback: ErrorCode) -> HttpResponse {
    let code = match err {
        LmsError::Validation(_) | LmsError::DateParse(_) => ErrorCode::ValidationFailed,
        LmsError::NotFound(_) => ErrorCode::NotFound,
        LmsError::Conflict(_) => ErrorCode::Conflict,
        LmsError::InvalidState(_) => ErrorCode::InvalidStateTransition,
        LmsError::Authorization(_) => ErrorCode::Forbidden,
        LmsError::Authentication(_) => ErrorCode::Unauthorized,
        _ => {
            error!("{}", err.format_simple());
            fallback
        }
    };
    status_response(err.http_status(), code, err.message())
}

/// 校验失败（400）
pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 资源不存在（404）
pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 无权访问（403）
pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

/// 状态冲突（409）
pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

fn status_response(status: u16, code: ErrorCode, message: &str) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

fn internal(message: &'static str) -> actix_web::Error {
    error!("{}", message);
    let response = HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ));
    InternalError::from_response(message, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(&LmsError::not_found("x"), ErrorCode::InternalServerError);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = error_response(&LmsError::invalid_state("x"), ErrorCode::InternalServerError);
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(&LmsError::validation("x"), ErrorCode::InternalServerError);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = error_response(
            &LmsError::database_operation("x"),
            ErrorCode::CourseUpdateFailed,
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_missing_is_error() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(storage_from_request(&None, &req).is_err());
        assert!(cache_from_request(&req).is_err());
        assert!(current_user(&req).is_err());
    }
}

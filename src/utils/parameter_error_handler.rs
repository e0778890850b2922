use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一格式的错误
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("请求体格式错误: {err}");
    tracing::debug!("{}", message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一格式的错误
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("查询参数错误: {err}");
    tracing::debug!("{}", message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

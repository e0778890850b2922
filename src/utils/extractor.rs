use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径参数 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            parse_positive_id(req.match_info().get("id"))
                .map(SafeIDI64)
                .map_err(bad_request),
        )
    }
}

fn parse_positive_id(raw: Option<&str>) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| "缺少路径参数 id".to_string())?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("无效的 ID: {raw}")),
    }
}

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42")), Ok(42));
        assert!(parse_positive_id(Some("0")).is_err());
        assert!(parse_positive_id(Some("-3")).is_err());
        assert!(parse_positive_id(Some("abc")).is_err());
        assert!(parse_positive_id(None).is_err());
    }

    #[actix_web::test]
    async fn test_extract_from_path() {
        let req = TestRequest::default().param("id", "7").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(7));

        let req = TestRequest::default().param("id", "x").to_http_request();
        let err = SafeIDI64::extract(&req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }
}

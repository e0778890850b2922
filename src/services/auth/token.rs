use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::users::responses::{TokenVerificationResponse, UserResponse};
use crate::services::current_user;

use super::AuthService;

pub async fn handle_verify_token(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse {
            is_valid: true,
            user_id: user.id,
            role: user.role,
        },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User information retrieved successfully",
    )))
}

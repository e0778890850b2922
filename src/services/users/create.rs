use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict, error_response};
use crate::utils::validate::{validate_email, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    // 验证用户名
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    if user_data.class_rate.is_some_and(|rate| !rate.is_finite() || rate < 0.0) {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Class rate must be a non-negative number",
        ));
    }

    let storage = service.get_storage(request)?;

    // 用户名、邮箱唯一
    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::UserAlreadyExists, "Username already exists"));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, ErrorCode::UserCreationFailed)),
    }
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::UserAlreadyExists, "Email already exists"));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, ErrorCode::UserCreationFailed)),
    }

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} ({}) created", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::UserCreationFailed)),
    }
}

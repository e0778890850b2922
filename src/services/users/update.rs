use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, cache_from_request, conflict, error_response, not_found};
use crate::utils::validate::validate_email;

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        update_data.email = Some(email);
    }

    if update_data
        .class_rate
        .is_some_and(|rate| !rate.is_finite() || rate < 0.0)
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Class rate must be a non-negative number",
        ));
    }

    let storage = service.get_storage(request)?;

    if let Some(email) = &update_data.email {
        match storage.get_user_by_email(email).await {
            Ok(Some(other)) if other.id != user_id => {
                return Ok(conflict(ErrorCode::UserAlreadyExists, "Email already exists"));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, ErrorCode::UserUpdateFailed)),
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 角色、状态变更需要立即生效
            cache_from_request(request)?
                .remove(&user_cache_key(user_id))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::UserUpdateFailed)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, cache_from_request, current_user, error_response, not_found};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;

    // 禁止删除当前用户
    if current.id == user_id {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_user(user_id).await {
        Ok(true) => {
            cache_from_request(request)?
                .remove(&user_cache_key(user_id))
                .await;
            info!("User {} deleted by {}", user_id, current.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::UserDeleteFailed)),
    }
}

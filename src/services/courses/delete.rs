use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .delete_course(course_id, AppConfig::get().calendar_offset())
        .await {
        Ok(true) => {
            info!("Course {} deleted", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::CourseDeleteFailed)),
    }
}

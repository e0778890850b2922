use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, check_teacher, course_detail, validate_course_fields};
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update_data.title = update_data.title.map(|t| t.trim().to_string());
    if let Err(msg) = validate_course_fields(
        update_data.title.as_deref(),
        update_data.price,
        update_data.duration_weeks,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(teacher_id) = update_data.teacher_id {
        match check_teacher(&storage, teacher_id).await {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
            Err(e) => return Ok(error_response(&e, ErrorCode::CourseUpdateFailed)),
        }
    }

    let course = match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::CourseUpdateFailed)),
    };

    match course_detail(&storage, course).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Course updated successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

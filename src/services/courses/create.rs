use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, check_teacher, course_detail, validate_course_fields};
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response};

pub async fn create_course(
    service: &CourseService,
    mut course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    course_data.title = course_data.title.trim().to_string();
    if let Err(msg) = validate_course_fields(
        Some(&course_data.title),
        course_data.price,
        course_data.duration_weeks,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(teacher_id) = course_data.teacher_id {
        match check_teacher(&storage, teacher_id).await {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
            Err(e) => return Ok(error_response(&e, ErrorCode::CourseCreationFailed)),
        }
    }

    let course = match storage.create_course(course_data).await {
        Ok(course) => course,
        Err(e) => return Ok(error_response(&e, ErrorCode::CourseCreationFailed)),
    };
    info!("Course {} created: {}", course.id, course.title);

    match course_detail(&storage, course).await {
        Ok(detail) => Ok(HttpResponse::Created().json(ApiResponse::success(
            detail,
            "Course created successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

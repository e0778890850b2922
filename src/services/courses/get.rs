use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, course_detail};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_public_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) if course.is_published => course,
        Ok(_) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match course_detail(&storage, course).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Course retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    if user.role == UserRole::Student && !course.is_published {
        return Ok(not_found(ErrorCode::CourseNotFound, "Course not found"));
    }

    match course_detail(&storage, course).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Course retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

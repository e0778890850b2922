use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    // 无权查看的记录按不存在处理
    let visible = match user.role {
        UserRole::Admin => true,
        UserRole::Student => enrollment.student_id == user.id,
        UserRole::Teacher => match storage.get_course_by_id(enrollment.course_id).await {
            Ok(course) => course.and_then(|c| c.teacher_id) == Some(user.id),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        },
    };
    if !visible {
        return Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment retrieved successfully",
    )))
}

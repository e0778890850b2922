use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::models::enrollments::{
    entities::EnrollmentStatus, requests::CreateEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user, error_response, forbidden, not_found};

pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 管理员报名直接生效，学生自助报名待审核
    let (student_id, status) = match user.role {
        UserRole::Admin => match enrollment_data.student_id {
            Some(student_id) => (student_id, EnrollmentStatus::Active),
            None => {
                return Ok(bad_request(
                    ErrorCode::ValidationFailed,
                    "student_id is required",
                ));
            }
        },
        UserRole::Student => match enrollment_data.student_id {
            Some(student_id) if student_id != user.id => {
                return Ok(forbidden(
                    ErrorCode::Forbidden,
                    "Students can only enroll themselves",
                ));
            }
            _ => (user.id, EnrollmentStatus::Pending),
        },
        UserRole::Teacher => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Teachers cannot create enrollments",
            ));
        }
    };

    match storage.get_user_by_id(student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Only students can be enrolled",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.get_course_by_id(enrollment_data.course_id).await {
        Ok(Some(course)) if course.is_published || user.is_admin() => {}
        Ok(_) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage
        .create_enrollment(student_id, enrollment_data.course_id, status)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in course {} ({})",
                student_id, enrollment.course_id, enrollment.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Enrollment created successfully",
            )))
        }
        Err(crate::errors::LmsError::Conflict(msg)) => {
            Ok(conflict(ErrorCode::EnrollmentAlreadyExists, msg))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

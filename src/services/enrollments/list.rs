use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::enrollments::requests::{EnrollmentListParams, EnrollmentListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn list_enrollments(
    service: &EnrollmentService,
    params: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut query = EnrollmentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        student_id: params.student_id,
        course_id: params.course_id,
        status: params.status,
        teacher_id: None,
    };
    match user.role {
        UserRole::Admin => {}
        UserRole::Teacher => query.teacher_id = Some(user.id),
        UserRole::Student => query.student_id = Some(user.id),
    }

    match storage.list_enrollments_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::enrollments::requests::UpdateEnrollmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn update_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    update_data: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .update_enrollment_status(enrollment_id, update_data.status)
        .await
    {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

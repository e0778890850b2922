use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn delete_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_enrollment(enrollment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Enrollment deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

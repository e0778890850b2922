use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, can_manage_course};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, forbidden, not_found};

pub async fn delete_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match can_manage_course(&storage, &user, assignment.course_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(forbidden(
                ErrorCode::AssignmentPermissionDenied,
                "You can only delete assignments of your own courses",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => {
            info!("Assignment {} deleted by {}", assignment_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Assignment deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, can_manage_course};
use crate::models::assignments::responses::AssignmentSubmissionsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, forbidden, not_found};

pub async fn list_submissions(
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
                "You can only view submissions of your own courses",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage.list_assignment_submissions(assignment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentSubmissionsResponse {
                assignment_id,
                items,
            },
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

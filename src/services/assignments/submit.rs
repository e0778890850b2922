use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::AssignmentService;
use crate::errors::LmsError;
use crate::models::assignments::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user, error_response, forbidden, not_found};
use crate::utils::validate::non_empty;

pub async fn submit_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    submission: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let content = non_empty(submission.content.as_deref());
    let file_url = non_empty(submission.file_url.as_deref());
    if content.is_none() && file_url.is_none() {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Submission must include content or a file",
        ));
    }

    let student = current_user(request)?;
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

    match storage.list_assignment_student_ids(assignment_id).await {
        Ok(ids) if ids.contains(&student.id) => {}
        Ok(_) => {
            return Ok(forbidden(
                ErrorCode::StudentNotTargeted,
                "This assignment is not assigned to you",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    // 允许迟交，但记录迟交标记
    let is_late = assignment.is_late_at(Utc::now());

    match storage
        .upsert_submission(assignment_id, student.id, content, file_url, is_late)
        .await
    {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} (late: {})",
                student.id, assignment_id, is_late
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Assignment submitted successfully",
            )))
        }
        Err(LmsError::InvalidState(msg)) => {
            Ok(conflict(ErrorCode::SubmissionAlreadyGraded, msg))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_my_submission(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_submission(assignment_id, student.id).await {
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submission,
            "Submission retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

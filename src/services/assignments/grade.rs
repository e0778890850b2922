use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, can_manage_course};
use crate::models::assignments::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found};
use crate::utils::validate::non_empty;

pub async fn grade_submission(
    service: &AssignmentService,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let grader = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let assignment = match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match can_manage_course(&storage, &grader, assignment.course_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(forbidden(
                ErrorCode::AssignmentPermissionDenied,
                "You can only grade submissions of your own courses",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    if !assignment.accepts_grade(grade_data.grade) {
        return Ok(bad_request(
            ErrorCode::GradeOutOfRange,
            format!("Grade must be between 0 and {}", assignment.max_grade),
        ));
    }

    match storage
        .grade_submission(
            submission_id,
            grader.id,
            grade_data.grade,
            non_empty(grade_data.feedback.as_deref()),
            non_empty(grade_data.feedback_file_url.as_deref()),
        )
        .await
    {
        Ok(Some(submission)) => {
            info!(
                "Submission {} graded {} by {}",
                submission_id, grade_data.grade, grader.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission graded successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

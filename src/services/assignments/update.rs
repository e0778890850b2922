use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, can_manage_course, untargetable_students, validate_max_grade};
use crate::config::AppConfig;
use crate::models::assignments::requests::{AssignmentDraft, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found};
use crate::storage::sea_orm_storage::lookups::unique_ids;
use crate::utils::datetime::parse_flexible;
use crate::utils::validate::non_empty;

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    update_data: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let existing = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match can_manage_course(&storage, &user, existing.course_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(forbidden(
                ErrorCode::AssignmentPermissionDenied,
                "You can only edit assignments of your own courses",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let title = match update_data.title.as_deref() {
        Some(raw) => match non_empty(Some(raw)) {
            Some(title) => title,
            None => return Ok(bad_request(ErrorCode::ValidationFailed, "Title is required")),
        },
        None => existing.title.clone(),
    };

    let max_grade = update_data.max_grade.unwrap_or(existing.max_grade);
    if let Err(msg) = validate_max_grade(max_grade) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    // 空字符串表示清除截止时间
    let due_date = match update_data.due_date.as_deref() {
        Some(raw) => match non_empty(Some(raw)) {
            Some(raw) => match parse_flexible(&raw, &AppConfig::get().calendar_offset()) {
                Ok(due) => Some(due.timestamp()),
                Err(_) => {
                    return Ok(bad_request(
                        ErrorCode::ValidationFailed,
                        format!("Invalid due date: {raw}"),
                    ));
                }
            },
            None => None,
        },
        None => existing.due_date.map(|d| d.timestamp()),
    };

    let student_ids = update_data
        .student_ids
        .map(|ids| unique_ids(ids.into_iter()));
    if let Some(ids) = &student_ids {
        match untargetable_students(&storage, existing.course_id, ids).await {
            Ok(missing) if missing.is_empty() => {}
            Ok(missing) => {
                return Ok(bad_request(
                    ErrorCode::StudentNotTargeted,
                    format!("Students not enrolled in this course: {missing:?}"),
                ));
            }
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }

    let draft = AssignmentDraft {
        course_id: existing.course_id,
        teacher_id: existing.teacher_id,
        title,
        description: match update_data.description.as_deref() {
            Some(raw) => non_empty(Some(raw)),
            None => existing.description.clone(),
        },
        due_date,
        max_grade,
        attachment_url: match update_data.attachment_url.as_deref() {
            Some(raw) => non_empty(Some(raw)),
            None => existing.attachment_url.clone(),
        },
    };

    match storage
        .update_assignment(assignment_id, draft, student_ids)
        .await
    {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

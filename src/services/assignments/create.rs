use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{
    AssignmentService, DEFAULT_MAX_GRADE, can_manage_course, untargetable_students,
    validate_max_grade,
};
use crate::config::AppConfig;
use crate::models::assignments::requests::{AssignmentDraft, CreateAssignmentRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found};
use crate::storage::sea_orm_storage::lookups::unique_ids;
use crate::utils::datetime::parse_flexible;
use crate::utils::validate::non_empty;

pub async fn create_assignment(
    service: &AssignmentService,
    assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(title) = non_empty(Some(assignment_data.title.as_str())) else {
        return Ok(bad_request(ErrorCode::ValidationFailed, "Title is required"));
    };

    let max_grade = assignment_data.max_grade.unwrap_or(DEFAULT_MAX_GRADE);
    if let Err(msg) = validate_max_grade(max_grade) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let due_date = match non_empty(assignment_data.due_date.as_deref()) {
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
    };

    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_id(assignment_data.course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match can_manage_course(&storage, &user, course.id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(forbidden(
                ErrorCode::AssignmentPermissionDenied,
                "You can only create assignments for your own courses",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let student_ids = unique_ids(assignment_data.student_ids.iter().copied());
    match untargetable_students(&storage, course.id, &student_ids).await {
        Ok(missing) if missing.is_empty() => {}
        Ok(missing) => {
            return Ok(bad_request(
                ErrorCode::StudentNotTargeted,
                format!("Students not enrolled in this course: {missing:?}"),
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let teacher_id = match user.role {
        UserRole::Teacher => Some(user.id),
        _ => course.teacher_id,
    };

    let draft = AssignmentDraft {
        course_id: course.id,
        teacher_id,
        title,
        description: non_empty(assignment_data.description.as_deref()),
        due_date,
        max_grade,
        attachment_url: non_empty(assignment_data.attachment_url.as_deref()),
    };

    match storage.create_assignment(draft, student_ids).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created for course {}",
                assignment.id, assignment.course_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, can_manage_course};
use crate::models::assignments::responses::AssignmentDetailResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, forbidden, not_found};

pub async fn get_assignment(
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

    let student_ids = match storage.list_assignment_student_ids(assignment_id).await {
        Ok(ids) => ids,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let allowed = match user.role {
        UserRole::Student => Ok(student_ids.contains(&user.id)),
        _ => can_manage_course(&storage, &user, assignment.course_id).await,
    };
    match allowed {
        Ok(true) => {}
        Ok(false) => {
            return Ok(forbidden(
                ErrorCode::AssignmentPermissionDenied,
                "You do not have access to this assignment",
            ));
        }
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let course_title = match storage.get_course_titles(&[assignment.course_id]).await {
        Ok(mut titles) => titles.remove(&assignment.course_id),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    // 学生只能看到自己是否被指派
    let student_ids = match user.role {
        UserRole::Student => vec![user.id],
        _ => student_ids,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            course_title,
            student_ids,
        },
        "Assignment retrieved successfully",
    )))
}

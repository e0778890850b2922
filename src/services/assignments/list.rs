use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn list_assignments(
    service: &AssignmentService,
    params: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut query = AssignmentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        course_id: params.course_id,
        ..Default::default()
    };
    match user.role {
        UserRole::Admin => {}
        UserRole::Teacher => query.teacher_id = Some(user.id),
        // 学生视角附带本人提交
        UserRole::Student => query.student_id = Some(user.id),
    }

    match storage.list_assignments_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::{CourseListParams, CourseListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};
use crate::utils::validate::non_empty;

fn to_query(params: CourseListParams, published: Option<bool>) -> CourseListQuery {
    CourseListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        teacher_id: params.teacher_id,
        published,
        search: non_empty(params.search.as_deref()),
    }
}

pub async fn list_public_courses(
    service: &CourseService,
    params: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_courses_with_pagination(to_query(params, Some(true)))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_courses(
    service: &CourseService,
    params: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 学生只能看到已发布课程
    let published = match user.role {
        UserRole::Student => Some(true),
        _ => params.published,
    };

    match storage
        .list_courses_with_pagination(to_query(params, published))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

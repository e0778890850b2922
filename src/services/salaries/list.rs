use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SalaryService;
use crate::models::salaries::requests::{SalaryListParams, SalaryListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn list_salaries(
    service: &SalaryService,
    params: SalaryListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 教师只能查看自己的工资
    let teacher_id = match user.role {
        UserRole::Admin => params.teacher_id,
        _ => Some(user.id),
    };

    let query = SalaryListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        teacher_id,
        year: params.year,
        month: params.month,
        status: params.status,
    };

    match storage.list_salaries_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Salary list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

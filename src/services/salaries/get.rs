use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SalaryService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_salary(
    service: &SalaryService,
    salary_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_salary_by_id(salary_id).await {
        // 教师只能查看自己的工资
        Ok(Some(salary)) if user.is_admin() || salary.teacher_id == user.id => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                salary,
                "Salary retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(ErrorCode::SalaryNotFound, "Salary not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

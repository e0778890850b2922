use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SalaryService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::salaries::requests::RecalculateSalaryRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, error_response, not_found};

pub async fn recalculate_salary(
    service: &SalaryService,
    recalc: RecalculateSalaryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !(1..=12).contains(&recalc.month) {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Month must be between 1 and 12",
        ));
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(recalc.teacher_id).await {
        Ok(Some(user)) if user.role != UserRole::Student => {}
        Ok(_) => return Ok(not_found(ErrorCode::UserNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match storage
        .recalculate_salary(
            recalc.teacher_id,
            recalc.year,
            recalc.month,
            AppConfig::get().calendar_offset(),
        )
        .await
    {
        Ok(salary) => {
            info!(
                "Salary recalculated for teacher {} {}-{:02}: {}",
                salary.teacher_id, salary.year, salary.month, salary.total_amount
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                salary,
                "Salary recalculated successfully",
            )))
        }
        Err(LmsError::Conflict(msg)) => Ok(conflict(ErrorCode::SalaryAlreadyPaid, msg)),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

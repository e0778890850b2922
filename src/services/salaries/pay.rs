use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SalaryService;
use crate::errors::LmsError;
use crate::models::salaries::requests::MarkSalaryPaidRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, current_user, error_response, not_found};
use crate::utils::validate::non_empty;

pub async fn mark_salary_paid(
    service: &SalaryService,
    salary_id: i64,
    pay_data: MarkSalaryPaidRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let payer = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .mark_salary_paid(salary_id, payer.id, non_empty(pay_data.note.as_deref()))
        .await
    {
        Ok(salary) => {
            info!("Salary {} marked paid by {}", salary.id, payer.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(salary, "Salary marked as paid")))
        }
        Err(LmsError::NotFound(msg)) => Ok(not_found(ErrorCode::SalaryNotFound, msg)),
        Err(LmsError::InvalidState(msg)) => Ok(conflict(ErrorCode::SalaryAlreadyPaid, msg)),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

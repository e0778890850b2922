use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_payment(
    service: &PaymentService,
    payment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_payment_by_id(payment_id).await {
        Ok(Some(payment)) if user.is_admin() || payment.student_id == user.id => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

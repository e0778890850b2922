use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PaymentService, review_error};
use crate::models::payments::requests::{ApprovePaymentRequest, RejectPaymentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user};
use crate::utils::validate::non_empty;

pub async fn approve_payment(
    service: &PaymentService,
    payment_id: i64,
    approve_data: ApprovePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let reviewer = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .approve_payment(
            payment_id,
            reviewer.id,
            non_empty(approve_data.note.as_deref()),
        )
        .await
    {
        Ok(payment) => {
            info!("Payment {} approved by {}", payment.id, reviewer.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment approved and enrollment activated",
            )))
        }
        Err(e) => Ok(review_error(&e)),
    }
}

pub async fn reject_payment(
    service: &PaymentService,
    payment_id: i64,
    reject_data: RejectPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(reason) = non_empty(Some(reject_data.reason.as_str())) else {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Rejection reason is required",
        ));
    };

    let reviewer = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.reject_payment(payment_id, reviewer.id, reason).await {
        Ok(payment) => {
            info!("Payment {} rejected by {}", payment.id, reviewer.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(payment, "Payment rejected")))
        }
        Err(e) => Ok(review_error(&e)),
    }
}

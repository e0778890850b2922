use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PaymentService;
use crate::models::payments::requests::{CreatePaymentRequest, NewPayment};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found};
use crate::utils::random_code::generate_payment_reference;
use crate::utils::validate::non_empty;

pub async fn create_payment(
    service: &PaymentService,
    payment_data: CreatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    if !payment_data.amount.is_finite() || payment_data.amount <= 0.0 {
        return Ok(bad_request(
            ErrorCode::PaymentAmountInvalid,
            "Payment amount must be greater than zero",
        ));
    }

    // 学生只能为自己登记，管理员需指定学生
    let student_id = match (user.role, payment_data.student_id) {
        (UserRole::Student, Some(id)) if id != user.id => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Students can only record their own payments",
            ));
        }
        (UserRole::Student, _) => user.id,
        (_, Some(id)) => id,
        (_, None) => {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "student_id is required",
            ));
        }
    };

    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(payment_data.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    let enrollment_id = match storage
        .get_enrollment(student_id, payment_data.course_id)
        .await
    {
        Ok(enrollment) => enrollment.map(|e| e.id),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let new_payment = NewPayment {
        student_id,
        course_id: payment_data.course_id,
        enrollment_id,
        amount: payment_data.amount,
        method: non_empty(payment_data.method.as_deref()),
        reference: generate_payment_reference(),
        note: non_empty(payment_data.note.as_deref()),
    };

    match storage.create_payment(new_payment).await {
        Ok(payment) => {
            info!(
                "Payment {} recorded for student {} ({})",
                payment.reference, payment.student_id, payment.amount
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                payment,
                "Payment recorded successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

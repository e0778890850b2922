use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::payments::requests::{PaymentListParams, PaymentListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn list_payments(
    service: &PaymentService,
    params: PaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let student_id = match user.role {
        UserRole::Student => Some(user.id),
        _ => params.student_id,
    };

    let query = PaymentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        student_id,
        course_id: params.course_id,
        status: params.status,
    };

    match storage.list_payments_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

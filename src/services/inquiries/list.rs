use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InquiryService;
use crate::models::inquiries::requests::InquiryListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn list_inquiries(
    service: &InquiryService,
    params: InquiryListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_inquiries_with_pagination(
            Some(params.pagination.page),
            Some(params.pagination.size),
            params.status,
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Inquiry list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn mark_handled(
    service: &InquiryService,
    inquiry_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.mark_inquiry_handled(inquiry_id).await {
        Ok(Some(inquiry)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            inquiry,
            "Inquiry marked as handled",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::InquiryNotFound, "Inquiry not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

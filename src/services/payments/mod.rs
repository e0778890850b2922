pub mod create;
pub mod get;
pub mod list;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::LmsError;
use crate::models::ErrorCode;
use crate::models::payments::requests::{
    ApprovePaymentRequest, CreatePaymentRequest, PaymentListParams, RejectPaymentRequest,
};
use crate::services::{conflict, error_response, not_found};
use crate::storage::Storage;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    pub async fn list_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_payments(self, query, request).await
    }

    pub async fn get_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_payment(self, payment_id, request).await
    }

    pub async fn create_payment(
        &self,
        payment_data: CreatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_payment(self, payment_data, request).await
    }

    // 审核通过，同时激活选课
    pub async fn approve_payment(
        &self,
        payment_id: i64,
        approve_data: ApprovePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::approve_payment(self, payment_id, approve_data, request).await
    }

    pub async fn reject_payment(
        &self,
        payment_id: i64,
        reject_data: RejectPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::reject_payment(self, payment_id, reject_data, request).await
    }
}

fn review_error(err: &LmsError) -> HttpResponse {
    match err {
        LmsError::NotFound(msg) => not_found(ErrorCode::PaymentNotFound, msg.as_str()),
        LmsError::InvalidState(msg) => conflict(ErrorCode::PaymentAlreadyReviewed, msg.as_str()),
        _ => error_response(err, ErrorCode::InternalServerError),
    }
}

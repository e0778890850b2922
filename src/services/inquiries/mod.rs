pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::inquiries::requests::{CreateInquiryRequest, InquiryListParams};
use crate::storage::Storage;

pub struct InquiryService {
    storage: Option<Arc<dyn Storage>>,
}

impl InquiryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 官网咨询表单
    pub async fn create_inquiry(
        &self,
        inquiry: CreateInquiryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_inquiry(self, inquiry, request).await
    }

    pub async fn list_inquiries(
        &self,
        query: InquiryListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_inquiries(self, query, request).await
    }

    pub async fn mark_handled(
        &self,
        inquiry_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::mark_handled(self, inquiry_id, request).await
    }
}

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 选课列表，按角色限定范围
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    // 管理员直接报名，学生自助报名
    pub async fn create_enrollment(
        &self,
        enrollment_data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, enrollment_data, request).await
    }

    pub async fn update_enrollment(
        &self,
        enrollment_id: i64,
        update_data: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment(self, enrollment_id, update_data, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }
}

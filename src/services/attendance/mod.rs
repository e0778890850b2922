pub mod get;
pub mod list;
pub mod mark;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::LmsError;
use crate::models::ErrorCode;
use crate::models::attendance::requests::{
    ApproveAttendanceRequest, AttendanceListParams, RejectAttendanceRequest,
};
use crate::services::{conflict, error_response, not_found};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 教师标记课时完成
    pub async fn mark_completed(
        &self,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_completed(self, event_id, request).await
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, query, request).await
    }

    pub async fn get_attendance(
        &self,
        attendance_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_attendance(self, attendance_id, request).await
    }

    pub async fn approve_attendance(
        &self,
        attendance_id: i64,
        approve_data: ApproveAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::approve_attendance(self, attendance_id, approve_data, request).await
    }

    pub async fn reject_attendance(
        &self,
        attendance_id: i64,
        reject_data: RejectAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::reject_attendance(self, attendance_id, reject_data, request).await
    }
}

// 标记时状态冲突表示已审核，审核时表示尚未完成
fn attendance_error(err: &LmsError, invalid_state: ErrorCode) -> HttpResponse {
    match err {
        LmsError::NotFound(msg) => not_found(ErrorCode::AttendanceNotFound, msg.as_str()),
        LmsError::InvalidState(msg) => conflict(invalid_state, msg.as_str()),
        LmsError::Conflict(msg) => conflict(ErrorCode::SalaryAlreadyPaid, msg.as_str()),
        _ => error_response(err, ErrorCode::InternalServerError),
    }
}

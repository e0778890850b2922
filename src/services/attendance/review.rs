use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, attendance_error};
use crate::config::AppConfig;
use crate::models::attendance::requests::{
    ApproveAttendanceRequest, AttendanceReview, RejectAttendanceRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user};
use crate::utils::validate::non_empty;

pub async fn approve_attendance(
    service: &AttendanceService,
    attendance_id: i64,
    approve_data: ApproveAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let bonus = approve_data.bonus.unwrap_or(0.0);
    if !bonus.is_finite() || bonus < 0.0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Bonus must be a non-negative number",
        ));
    }

    let reviewer = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .review_attendance(
            attendance_id,
            reviewer.id,
            AttendanceReview::Approve { bonus },
            AppConfig::get().calendar_offset(),
        )
        .await
    {
        Ok(sync) => {
            info!(
                "Attendance {} approved by {} (bonus {})",
                attendance_id, reviewer.id, bonus
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(sync, "Attendance approved")))
        }
        Err(e) => Ok(attendance_error(&e, ErrorCode::AttendanceNotCompleted)),
    }
}

pub async fn reject_attendance(
    service: &AttendanceService,
    attendance_id: i64,
    reject_data: RejectAttendanceRequest,
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

    match storage
        .review_attendance(
            attendance_id,
            reviewer.id,
            AttendanceReview::Reject { reason },
            AppConfig::get().calendar_offset(),
        )
        .await
    {
        Ok(sync) => {
            info!("Attendance {} rejected by {}", attendance_id, reviewer.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(sync, "Attendance rejected")))
        }
        Err(e) => Ok(attendance_error(&e, ErrorCode::AttendanceNotCompleted)),
    }
}

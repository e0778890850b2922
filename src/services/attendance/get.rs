use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_attendance(
    service: &AttendanceService,
    attendance_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_attendance_by_id(attendance_id).await {
        Ok(Some(record)) if user.is_admin() || record.teacher_id == user.id => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Attendance record retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::config::AppConfig;
use crate::models::attendance::requests::{AttendanceListParams, AttendanceListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response};
use crate::utils::datetime::month_bounds;

pub async fn list_attendance(
    service: &AttendanceService,
    params: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    // 按课时开始时间所在月份过滤，年月需同时提供
    let range = match (params.year, params.month) {
        (Some(year), Some(month)) => {
            match month_bounds(year, month, &AppConfig::get().calendar_offset()) {
                Some(bounds) => Some(bounds),
                None => {
                    return Ok(bad_request(
                        ErrorCode::ValidationFailed,
                        format!("Invalid month: {year}-{month}"),
                    ));
                }
            }
        }
        (None, None) => None,
        _ => {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "year and month must be provided together",
            ));
        }
    };

    // 教师只能查看自己的考勤
    let teacher_id = match user.role {
        UserRole::Admin => params.teacher_id,
        _ => Some(user.id),
    };

    let query = AttendanceListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        status: params.status,
        teacher_id,
        range,
    };

    let storage = service.get_storage(request)?;
    match storage.list_attendance_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

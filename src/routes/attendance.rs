use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    ApproveAttendanceRequest, AttendanceListParams, RejectAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(query.into_inner(), &req)
        .await
}

pub async fn get_attendance(
    req: HttpRequest,
    attendance_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(attendance_id.0, &req).await
}

pub async fn mark_completed(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark_completed(event_id.0, &req).await
}

pub async fn approve_attendance(
    req: HttpRequest,
    attendance_id: SafeIDI64,
    approve_data: Option<web::Json<ApproveAttendanceRequest>>,
) -> ActixResult<HttpResponse> {
    let approve_data = approve_data.map(|d| d.into_inner()).unwrap_or_default();
    ATTENDANCE_SERVICE
        .approve_attendance(attendance_id.0, approve_data, &req)
        .await
}

pub async fn reject_attendance(
    req: HttpRequest,
    attendance_id: SafeIDI64,
    reject_data: web::Json<RejectAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .reject_attendance(attendance_id.0, reject_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            // 教师查看自己的考勤，管理员查看全部（业务层处理）
            .service(
                web::resource("")
                    .route(web::get().to(list_attendance))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 只有被分配的教师可以标记完成
            .service(
                web::resource("/events/{id}/complete")
                    .route(web::post().to(mark_completed))
                    .wrap(middlewares::RequireRole::new(&UserRole::Teacher)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_attendance))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::scope("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/approve", web::post().to(approve_attendance))
                    .route("/reject", web::post().to(reject_attendance)),
            ),
    );
}

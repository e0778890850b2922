use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::calendar::requests::{
    CalendarEventRequest, CalendarListParams, UpdateCalendarEventRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CalendarService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CalendarService 实例
static CALENDAR_SERVICE: Lazy<CalendarService> = Lazy::new(CalendarService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<CalendarListParams>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.list_events(query.into_inner(), &req).await
}

pub async fn get_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.get_event(event_id.0, &req).await
}

pub async fn create_event(
    req: HttpRequest,
    event_data: web::Json<CalendarEventRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .create_event(event_data.into_inner(), &req)
        .await
}

pub async fn update_event(
    req: HttpRequest,
    event_id: SafeIDI64,
    event_data: web::Json<UpdateCalendarEventRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .update_event(event_id.0, event_data.into_inner(), &req)
        .await
}

pub async fn delete_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.delete_event(event_id.0, &req).await
}

// 配置路由
pub fn configure_calendar_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/calendar/events")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 可见范围按角色过滤（业务层处理）
                    .route(web::get().to(list_events))
                    .route(
                        web::post()
                            .to(create_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_event))
                    .route(
                        web::put()
                            .to(update_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CalendarService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn delete_event(
    service: &CalendarService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .delete_event(event_id, AppConfig::get().calendar_offset())
        .await {
        Ok(true) => {
            info!("Calendar event {} deleted", event_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Calendar event deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

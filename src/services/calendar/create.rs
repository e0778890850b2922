use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CalendarService, build_event_draft, check_references};
use crate::config::AppConfig;
use crate::models::calendar::requests::CalendarEventRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response};

pub async fn create_event(
    service: &CalendarService,
    event_data: CalendarEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 先校验表单，不合法时不访问存储
    let draft = match build_event_draft(&event_data, &AppConfig::get().calendar_offset()) {
        Ok(draft) => draft,
        Err(msg) => return Ok(bad_request(ErrorCode::EventValidationFailed, msg)),
    };

    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(e) = check_references(&storage, &draft).await {
        return Ok(error_response(&e, ErrorCode::EventValidationFailed));
    }

    match storage.create_event(draft, user.id).await {
        Ok(event) => {
            info!("Calendar event {} ({}) created", event.id, event.event_type);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                event,
                "Calendar event created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::validate::merge_with_existing;
use super::{CalendarService, build_event_draft, check_references};
use crate::config::AppConfig;
use crate::models::calendar::requests::UpdateCalendarEventRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};

pub async fn update_event(
    service: &CalendarService,
    event_id: i64,
    event_data: UpdateCalendarEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let merged = merge_with_existing(&existing, event_data);
    let draft = match build_event_draft(&merged, &AppConfig::get().calendar_offset()) {
        Ok(draft) => draft,
        Err(msg) => return Ok(bad_request(ErrorCode::EventValidationFailed, msg)),
    };

    if let Err(e) = check_references(&storage, &draft).await {
        return Ok(error_response(&e, ErrorCode::EventValidationFailed));
    }

    match storage
        .update_event(event_id, draft, AppConfig::get().calendar_offset())
        .await {
        Ok(Some(event)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            event,
            "Calendar event updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

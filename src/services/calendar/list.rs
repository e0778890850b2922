use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::sync::Arc;

use super::CalendarService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::calendar::{
    entities::CalendarEvent,
    requests::{CalendarListParams, CalendarQuery, EventVisibility},
    responses::{CalendarEventItem, CalendarEventListResponse},
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, not_found};
use crate::storage::Storage;
use crate::utils::datetime::{parse_flexible, to_datetime_local};
use crate::utils::validate::non_empty;

/// 单次查询的最大窗口
const MAX_WINDOW_DAYS: i64 = 366;

/// 解析查询窗口；缺省时从当前时间开始取默认天数
pub(crate) fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    offset: &FixedOffset,
    default_days: i64,
    now: DateTime<Utc>,
) -> std::result::Result<(DateTime<Utc>, DateTime<Utc>), String> {
    let parse = |raw: Option<&str>| -> std::result::Result<Option<DateTime<Utc>>, String> {
        match non_empty(raw) {
            Some(raw) => parse_flexible(&raw, offset)
                .map(Some)
                .map_err(|_| format!("Invalid date: {raw}")),
            None => Ok(None),
        }
    };

    let window = Duration::days(default_days.max(1));
    let (from, to) = match (parse(from)?, parse(to)?) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, from + window),
        (None, Some(to)) => (to - window, to),
        (None, None) => (now, now + window),
    };

    if to <= from {
        return Err("`to` must be later than `from`".to_string());
    }
    if to - from > Duration::days(MAX_WINDOW_DAYS) {
        return Err(format!("Window cannot exceed {MAX_WINDOW_DAYS} days"));
    }
    Ok((from, to))
}

async fn visibility_for(storage: &Arc<dyn Storage>, user: &User) -> Result<EventVisibility> {
    Ok(match user.role {
        UserRole::Admin => EventVisibility::All,
        UserRole::Teacher => EventVisibility::Teacher(user.id),
        UserRole::Student => {
            EventVisibility::Courses(storage.list_active_course_ids(user.id).await?)
        }
    })
}

fn is_visible(visibility: &EventVisibility, event: &CalendarEvent) -> bool {
    match visibility {
        EventVisibility::All => true,
        EventVisibility::Teacher(id) => event.teacher_id.is_none_or(|t| t == *id),
        EventVisibility::Courses(ids) => event.course_id.is_none_or(|c| ids.contains(&c)),
    }
}

/// 附加课程名、教师名、本地时间与考勤状态
async fn enrich(
    storage: &Arc<dyn Storage>,
    events: Vec<CalendarEvent>,
    offset: &FixedOffset,
) -> Result<Vec<CalendarEventItem>> {
    let course_ids: Vec<i64> = events.iter().filter_map(|e| e.course_id).collect();
    let teacher_ids: Vec<i64> = events.iter().filter_map(|e| e.teacher_id).collect();
    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();

    let course_titles = storage.get_course_titles(&course_ids).await?;
    let teacher_names = storage.get_user_names(&teacher_ids).await?;
    let statuses = storage.get_attendance_statuses(&event_ids).await?;

    Ok(events
        .into_iter()
        .map(|event| CalendarEventItem {
            course_title: event.course_id.and_then(|id| course_titles.get(&id).cloned()),
            teacher_name: event.teacher_id.and_then(|id| teacher_names.get(&id).cloned()),
            start_local: to_datetime_local(&event.start_time, offset),
            end_local: event.end_time.map(|end| to_datetime_local(&end, offset)),
            attendance_status: statuses.get(&event.id).copied(),
            event,
        })
        .collect())
}

pub async fn list_events(
    service: &CalendarService,
    params: CalendarListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let offset = config.calendar_offset();

    let (from, to) = match resolve_window(
        params.from.as_deref(),
        params.to.as_deref(),
        &offset,
        config.calendar.default_window_days,
        Utc::now(),
    ) {
        Ok(window) => window,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let visibility = match visibility_for(&storage, &user).await {
        Ok(visibility) => visibility,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let query = CalendarQuery {
        from: from.timestamp(),
        to: to.timestamp(),
        event_type: params.event_type,
        course_id: params.course_id,
        teacher_id: params.teacher_id,
        visibility,
    };

    let items = match storage.list_events(query).await {
        Ok(events) => enrich(&storage, events, &offset).await,
        Err(e) => Err(e),
    };

    match items {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CalendarEventListResponse { items, from, to },
            "Calendar events retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_event(
    service: &CalendarService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let offset = AppConfig::get().calendar_offset();

    let event = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match visibility_for(&storage, &user).await {
        Ok(visibility) if is_visible(&visibility, &event) => {}
        Ok(_) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    }

    match enrich(&storage, vec![event], &offset).await {
        Ok(mut items) => match items.pop() {
            Some(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                item,
                "Calendar event retrieved successfully",
            ))),
            None => Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        },
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::parse_utc_offset;

    fn now() -> DateTime<Utc> {
        parse_flexible("2025-03-01T00:00:00Z", &parse_utc_offset("Z").unwrap()).unwrap()
    }

    #[test]
    fn test_default_window() {
        let tz = parse_utc_offset("Z").unwrap();
        let (from, to) = resolve_window(None, None, &tz, 31, now()).unwrap();
        assert_eq!(from, now());
        assert_eq!(to - from, Duration::days(31));
    }

    #[test]
    fn test_window_from_local_inputs() {
        let tz = parse_utc_offset("+08:00").unwrap();
        let (from, to) =
            resolve_window(Some("2025-03-01T00:00"), Some("2025-04-01T00:00"), &tz, 31, now())
                .unwrap();
        assert_eq!(from.to_rfc3339(), "2025-02-28T16:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2025-03-31T16:00:00+00:00");
    }

    #[test]
    fn test_invalid_window() {
        let tz = parse_utc_offset("Z").unwrap();
        assert!(resolve_window(Some("2025-03-02T00:00"), Some("2025-03-01T00:00"), &tz, 31, now()).is_err());
        assert!(resolve_window(Some("yesterday"), None, &tz, 31, now()).is_err());
        assert!(resolve_window(Some("2024-01-01T00:00"), Some("2026-01-01T00:00"), &tz, 31, now()).is_err());
    }

    #[test]
    fn test_visibility_rules() {
        let now = now();
        let event = |course_id, teacher_id| CalendarEvent {
            id: 1,
            title: "x".to_string(),
            description: None,
            event_type: crate::models::calendar::entities::EventType::Other,
            start_time: now,
            end_time: None,
            all_day: false,
            course_id,
            teacher_id,
            payment_amount: None,
            color: "#6B7280".to_string(),
            created_by: None,
            created_at: now,
            updated_at: now,
        };

        assert!(is_visible(&EventVisibility::Teacher(2), &event(None, Some(2))));
        assert!(is_visible(&EventVisibility::Teacher(2), &event(None, None)));
        assert!(!is_visible(&EventVisibility::Teacher(2), &event(None, Some(3))));
        assert!(is_visible(&EventVisibility::Courses(vec![5]), &event(Some(5), None)));
        assert!(is_visible(&EventVisibility::Courses(vec![5]), &event(None, Some(3))));
        assert!(!is_visible(&EventVisibility::Courses(vec![5]), &event(Some(6), None)));
    }
}

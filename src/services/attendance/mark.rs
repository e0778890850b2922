use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{AttendanceService, attendance_error};
use crate::config::AppConfig;
use crate::models::attendance::entities::can_mark_completed;
use crate::models::calendar::entities::{CalendarEvent, EventType};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found};

/// 标记前的检查：课程类事件、分配给该教师、已经结束
pub(crate) fn check_mark_allowed(
    event: &CalendarEvent,
    teacher_id: i64,
    now: DateTime<Utc>,
) -> Result<(), (ErrorCode, &'static str)> {
    if event.event_type != EventType::Class {
        return Err((
            ErrorCode::EventValidationFailed,
            "Only class events can be marked as completed",
        ));
    }
    if event.teacher_id != Some(teacher_id) {
        return Err((
            ErrorCode::EventPermissionDenied,
            "This class is not assigned to you",
        ));
    }
    if !can_mark_completed(event.effective_end(), now) {
        return Err((
            ErrorCode::ClassNotFinished,
            "The class has not finished yet",
        ));
    }
    Ok(())
}

/// 课时金额：事件金额，其次教师课时费，最后使用默认值
pub(crate) fn resolve_amount(event: &CalendarEvent, teacher: &User, default_rate: f64) -> f64 {
    event
        .payment_amount
        .or(teacher.class_rate)
        .unwrap_or(default_rate)
}

pub async fn mark_completed(
    service: &AttendanceService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = current_user(request)?;
    let storage = service.get_storage(request)?;

    let event = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let now = Utc::now();
    if let Err((code, msg)) = check_mark_allowed(&event, teacher.id, now) {
        return Ok(match code {
            ErrorCode::EventPermissionDenied => forbidden(code, msg),
            _ => bad_request(code, msg),
        });
    }

    let amount = resolve_amount(&event, &teacher, AppConfig::get().salary.default_class_rate);

    match storage
        .mark_class_completed(event_id, teacher.id, amount, now.timestamp())
        .await
    {
        Ok(sync) => {
            info!(
                "Class {} marked completed by teacher {} (amount {})",
                event_id, teacher.id, amount
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                sync,
                "Class marked as completed",
            )))
        }
        Err(e) => Ok(attendance_error(&e, ErrorCode::AttendanceAlreadyReviewed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn class_event(start: DateTime<Utc>, minutes: i64) -> CalendarEvent {
        CalendarEvent {
            id: 1,
            title: "Piano".to_string(),
            description: None,
            event_type: EventType::Class,
            start_time: start,
            end_time: Some(start + Duration::minutes(minutes)),
            all_day: false,
            course_id: Some(1),
            teacher_id: Some(7),
            payment_amount: None,
            color: EventType::Class.default_color().to_string(),
            created_by: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn teacher(class_rate: Option<f64>) -> User {
        let now = fixed_now();
        User {
            id: 7,
            username: "teacher".to_string(),
            email: "t@example.com".to_string(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            full_name: None,
            phone: None,
            avatar_url: None,
            class_rate,
            last_seen: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_future_class_is_refused() {
        let event = class_event(fixed_now() + Duration::hours(1), 60);
        let (code, _) = check_mark_allowed(&event, 7, fixed_now()).unwrap_err();
        assert_eq!(code, ErrorCode::ClassNotFinished);
    }

    #[test]
    fn test_running_class_is_refused() {
        let event = class_event(fixed_now() - Duration::minutes(30), 60);
        let (code, _) = check_mark_allowed(&event, 7, fixed_now()).unwrap_err();
        assert_eq!(code, ErrorCode::ClassNotFinished);
    }

    #[test]
    fn test_finished_class_is_allowed() {
        let event = class_event(fixed_now() - Duration::hours(2), 60);
        assert!(check_mark_allowed(&event, 7, fixed_now()).is_ok());
    }

    #[test]
    fn test_other_teacher_is_refused() {
        let event = class_event(fixed_now() - Duration::hours(2), 60);
        let (code, _) = check_mark_allowed(&event, 8, fixed_now()).unwrap_err();
        assert_eq!(code, ErrorCode::EventPermissionDenied);
    }

    #[test]
    fn test_non_class_is_refused() {
        let mut event = class_event(fixed_now() - Duration::hours(2), 60);
        event.event_type = EventType::Exam;
        let (code, _) = check_mark_allowed(&event, 7, fixed_now()).unwrap_err();
        assert_eq!(code, ErrorCode::EventValidationFailed);
    }

    #[test]
    fn test_amount_fallbacks() {
        let mut event = class_event(fixed_now(), 60);
        assert_eq!(resolve_amount(&event, &teacher(None), 25.0), 25.0);
        assert_eq!(resolve_amount(&event, &teacher(Some(40.0)), 25.0), 40.0);
        event.payment_amount = Some(55.0);
        assert_eq!(resolve_amount(&event, &teacher(Some(40.0)), 25.0), 55.0);
    }
}

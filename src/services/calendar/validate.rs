//! 日历事件表单校验
//!
//! 所有校验在访问存储之前完成，失败时返回可直接展示的提示信息。

use chrono::FixedOffset;

use crate::models::calendar::{
    entities::{CalendarEvent, EventType},
    requests::{CalendarEventRequest, EventDraft, UpdateCalendarEventRequest},
};
use crate::utils::datetime::parse_flexible;
use crate::utils::validate::{non_empty, validate_hex_color};

/// 把表单转换为可写库的事件数据
pub fn build_event_draft(
    req: &CalendarEventRequest,
    offset: &FixedOffset,
) -> Result<EventDraft, String> {
    let title = non_empty(req.title.as_deref()).ok_or("Title is required")?;

    let start_raw = non_empty(req.start_time.as_deref()).ok_or("Start time is required")?;
    let start = parse_flexible(&start_raw, offset)
        .map_err(|_| format!("Invalid start time: {start_raw}"))?;

    let end = match non_empty(req.end_time.as_deref()) {
        Some(raw) => {
            let end = parse_flexible(&raw, offset).map_err(|_| format!("Invalid end time: {raw}"))?;
            if end < start {
                return Err("End time must not be earlier than start time".to_string());
            }
            Some(end)
        }
        None => None,
    };

    let event_type = req.event_type.unwrap_or(EventType::Other);

    if event_type == EventType::Class && req.course_id.is_none() {
        return Err("Class events must belong to a course".to_string());
    }

    if let Some(amount) = req.payment_amount
        && (!amount.is_finite() || amount < 0.0)
    {
        return Err("Payment amount must be a non-negative number".to_string());
    }

    if event_type == EventType::Payment {
        if req.teacher_id.is_none() {
            return Err("Payment events must be assigned to a teacher".to_string());
        }
        if !req.payment_amount.is_some_and(|amount| amount > 0.0) {
            return Err("Payment events require an amount greater than zero".to_string());
        }
    }

    let color = match non_empty(req.color.as_deref()) {
        Some(color) => {
            validate_hex_color(&color)?;
            color
        }
        None => event_type.default_color().to_string(),
    };

    Ok(EventDraft {
        title,
        description: non_empty(req.description.as_deref()),
        event_type,
        start_time: start.timestamp(),
        end_time: end.map(|e| e.timestamp()),
        all_day: req.all_day.unwrap_or(false),
        course_id: req.course_id,
        teacher_id: req.teacher_id,
        payment_amount: req.payment_amount,
        color,
    })
}

/// 部分更新：未提供的字段沿用原事件，显式 null 清空可选字段
pub fn merge_with_existing(
    existing: &CalendarEvent,
    req: UpdateCalendarEventRequest,
) -> CalendarEventRequest {
    CalendarEventRequest {
        title: req.title.or_else(|| Some(existing.title.clone())),
        description: req
            .description
            .unwrap_or_else(|| existing.description.clone()),
        event_type: req.event_type.or(Some(existing.event_type)),
        start_time: req
            .start_time
            .or_else(|| Some(existing.start_time.to_rfc3339())),
        end_time: req
            .end_time
            .unwrap_or_else(|| existing.end_time.map(|t| t.to_rfc3339())),
        all_day: req.all_day.or(Some(existing.all_day)),
        course_id: req.course_id.unwrap_or(existing.course_id),
        teacher_id: req.teacher_id.unwrap_or(existing.teacher_id),
        payment_amount: req.payment_amount.unwrap_or(existing.payment_amount),
        color: req.color.or_else(|| Some(existing.color.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::{parse_utc_offset, to_datetime_local, timestamp_to_datetime};

    fn utc() -> FixedOffset {
        parse_utc_offset("Z").unwrap()
    }

    fn class_request() -> CalendarEventRequest {
        CalendarEventRequest {
            title: Some("Guitar 101".to_string()),
            event_type: Some(EventType::Class),
            start_time: Some("2025-03-01T10:00".to_string()),
            end_time: Some("2025-03-01T11:00".to_string()),
            course_id: Some(1),
            teacher_id: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let req = CalendarEventRequest {
            title: Some("   ".to_string()),
            ..class_request()
        };
        assert_eq!(build_event_draft(&req, &utc()).unwrap_err(), "Title is required");
    }

    #[test]
    fn test_missing_start_is_rejected() {
        let req = CalendarEventRequest {
            start_time: None,
            ..class_request()
        };
        assert_eq!(
            build_event_draft(&req, &utc()).unwrap_err(),
            "Start time is required"
        );
    }

    #[test]
    fn test_end_before_start() {
        let req = CalendarEventRequest {
            end_time: Some("2025-03-01T09:00".to_string()),
            ..class_request()
        };
        assert!(build_event_draft(&req, &utc()).is_err());
    }

    #[test]
    fn test_class_requires_course() {
        let req = CalendarEventRequest {
            course_id: None,
            ..class_request()
        };
        assert!(build_event_draft(&req, &utc()).is_err());
    }

    #[test]
    fn test_payment_event_rules() {
        let req = CalendarEventRequest {
            title: Some("Bonus".to_string()),
            event_type: Some(EventType::Payment),
            start_time: Some("2025-03-01T10:00".to_string()),
            teacher_id: Some(2),
            payment_amount: Some(0.0),
            ..Default::default()
        };
        assert!(build_event_draft(&req, &utc()).is_err());

        let req = CalendarEventRequest {
            payment_amount: Some(40.0),
            ..req
        };
        assert!(build_event_draft(&req, &utc()).is_ok());
    }

    #[test]
    fn test_color_default_and_validation() {
        let draft = build_event_draft(&class_request(), &utc()).unwrap();
        assert_eq!(draft.color, EventType::Class.default_color());

        let req = CalendarEventRequest {
            color: Some("blue".to_string()),
            ..class_request()
        };
        assert!(build_event_draft(&req, &utc()).is_err());
    }

    #[test]
    fn test_local_time_uses_offset() {
        let tz = parse_utc_offset("+08:00").unwrap();
        let draft = build_event_draft(&class_request(), &tz).unwrap();
        let start = timestamp_to_datetime(draft.start_time);
        assert_eq!(start.to_rfc3339(), "2025-03-01T02:00:00+00:00");
        assert_eq!(to_datetime_local(&start, &tz), "2025-03-01T10:00");
    }

    fn existing_event(draft: &EventDraft) -> CalendarEvent {
        let now = chrono::Utc::now();
        CalendarEvent {
            id: 1,
            title: draft.title.clone(),
            description: Some("Bring the workbook".to_string()),
            event_type: draft.event_type,
            start_time: timestamp_to_datetime(draft.start_time),
            end_time: draft.end_time.map(timestamp_to_datetime),
            all_day: false,
            course_id: draft.course_id,
            teacher_id: draft.teacher_id,
            payment_amount: Some(25.0),
            color: draft.color.clone(),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_merge_keeps_existing_fields() {
        let draft = build_event_draft(&class_request(), &utc()).unwrap();
        let existing = existing_event(&draft);
        let merged = merge_with_existing(
            &existing,
            UpdateCalendarEventRequest {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        );
        let updated = build_event_draft(&merged, &utc()).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.start_time, draft.start_time);
        assert_eq!(updated.end_time, draft.end_time);
        assert_eq!(updated.course_id, Some(1));
        assert_eq!(updated.teacher_id, Some(2));
        assert_eq!(updated.payment_amount, Some(25.0));
        assert_eq!(updated.description.as_deref(), Some("Bring the workbook"));
    }

    #[test]
    fn test_explicit_null_clears_optional_fields() {
        let draft = build_event_draft(&class_request(), &utc()).unwrap();
        let existing = existing_event(&draft);
        let req: UpdateCalendarEventRequest = serde_json::from_value(serde_json::json!({
            "description": null,
            "end_time": null,
            "teacher_id": null,
            "payment_amount": null,
        }))
        .unwrap();
        assert_eq!(req.teacher_id, Some(None));
        assert_eq!(req.course_id, None);

        let updated = build_event_draft(&merge_with_existing(&existing, req), &utc()).unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.end_time, None);
        assert_eq!(updated.teacher_id, None);
        assert_eq!(updated.payment_amount, None);
        assert_eq!(updated.course_id, Some(1));
    }

    #[test]
    fn test_clearing_course_of_class_is_rejected() {
        let draft = build_event_draft(&class_request(), &utc()).unwrap();
        let existing = existing_event(&draft);
        let req: UpdateCalendarEventRequest =
            serde_json::from_value(serde_json::json!({ "course_id": null })).unwrap();
        assert!(build_event_draft(&merge_with_existing(&existing, req), &utc()).is_err());
    }
}

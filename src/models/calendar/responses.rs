use super::entities::CalendarEvent;
use crate::models::attendance::AttendanceStatus;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarEventItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub event: CalendarEvent,
    pub course_title: Option<String>,
    pub teacher_name: Option<String>,
    /// datetime-local 格式，按配置时区
    pub start_local: String,
    pub end_local: Option<String>,
    pub attendance_status: Option<AttendanceStatus>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarEventListResponse {
    pub items: Vec<CalendarEventItem>,
    pub from: chrono::DateTime<chrono::Utc>,
    pub to: chrono::DateTime<chrono::Utc>,
}

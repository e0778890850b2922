use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 日历事件类型
    pub enum EventType in "事件类型" => "../frontend/src/types/generated/calendar.ts" {
        Class = "class",
        Assignment = "assignment",
        Exam = "exam",
        Payment = "payment",
        Holiday = "holiday",
        Other = "other",
    }
}

impl EventType {
    /// 未指定颜色时的默认颜色
    pub fn default_color(&self) -> &'static str {
        match self {
            EventType::Class => "#3B82F6",
            EventType::Assignment => "#F59E0B",
            EventType::Exam => "#EF4444",
            EventType::Payment => "#10B981",
            EventType::Holiday => "#8B5CF6",
            EventType::Other => "#6B7280",
        }
    }
}

// 日历事件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub all_day: bool,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub payment_amount: Option<f64>,
    pub color: String,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CalendarEvent {
    /// 课时结束时间；未设置结束时间时，全天事件以当天结束计，否则以开始时间计
    pub fn effective_end(&self) -> chrono::DateTime<chrono::Utc> {
        match self.end_time {
            Some(end) => end,
            None if self.all_day => self.start_time + chrono::Duration::days(1),
            None => self.start_time,
        }
    }
}

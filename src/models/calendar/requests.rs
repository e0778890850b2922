use super::entities::EventType;
use serde::Deserialize;
use serde_with::rust::double_option;
use ts_rs::TS;

// 创建/更新日历事件请求，时间接受 ISO 8601 或 datetime-local
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub all_day: Option<bool>,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub payment_amount: Option<f64>,
    pub color: Option<String>,
}

// 部分更新日历事件请求：字段缺省表示不修改，显式 null 表示清空
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct UpdateCalendarEventRequest {
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    pub description: Option<Option<String>>,
    pub event_type: Option<EventType>,
    pub start_time: Option<String>,
    #[serde(default, with = "double_option")]
    #[ts(optional, as = "Option<Option<String>>")]
    pub end_time: Option<Option<String>>,
    pub all_day: Option<bool>,
    #[serde(default, with = "double_option")]
    #[ts(optional, as = "Option<Option<i64>>")]
    pub course_id: Option<Option<i64>>,
    #[serde(default, with = "double_option")]
    #[ts(optional, as = "Option<Option<i64>>")]
    pub teacher_id: Option<Option<i64>>,
    #[serde(default, with = "double_option")]
    #[ts(optional, as = "Option<Option<f64>>")]
    pub payment_amount: Option<Option<f64>>,
    pub color: Option<String>,
}

// 日历查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub event_type: Option<EventType>,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

// 通过校验、可直接写库的事件数据
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub all_day: bool,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub payment_amount: Option<f64>,
    pub color: String,
}

// 事件可见范围
#[derive(Debug, Clone, PartialEq)]
pub enum EventVisibility {
    All,
    /// 分配给该教师的事件以及未指定教师的事件
    Teacher(i64),
    /// 这些课程的事件以及未关联课程的事件
    Courses(Vec<i64>),
}

// 日历查询（存储层）
#[derive(Debug, Clone)]
pub struct CalendarQuery {
    pub from: i64,
    pub to: i64,
    pub event_type: Option<EventType>,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub visibility: EventVisibility,
}

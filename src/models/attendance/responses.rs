use super::entities::{AttendanceRecord, LectureAttendanceRecord};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: AttendanceRecord,
    pub event_title: Option<String>,
    pub course_id: Option<i64>,
    pub course_title: Option<String>,
    pub teacher_name: Option<String>,
    pub reviewer_name: Option<String>,
    pub class_start: Option<chrono::DateTime<chrono::Utc>>,
    pub class_end: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceListItem>,
    pub pagination: PaginationInfo,
}

// 标记完成 / 审核后的两张考勤表记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSyncResponse {
    pub class_attendance: AttendanceRecord,
    pub lecture_attendance: Option<LectureAttendanceRecord>,
}

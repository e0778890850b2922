use super::entities::AttendanceStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct ApproveAttendanceRequest {
    pub bonus: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RejectAttendanceRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AttendanceStatus>,
    pub teacher_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// 考勤列表查询（存储层），时间范围按课时开始时间过滤
#[derive(Debug, Clone, Default)]
pub struct AttendanceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub teacher_id: Option<i64>,
    pub range: Option<(i64, i64)>,
}

// 审核决定
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceReview {
    Approve { bonus: f64 },
    Reject { reason: String },
}

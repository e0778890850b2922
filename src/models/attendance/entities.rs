use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 课时考勤状态
    pub enum AttendanceStatus in "考勤状态" => "../frontend/src/types/generated/attendance.ts" {
        NotStarted = "not_started",
        Completed = "completed",
        Approved = "approved",
        Rejected = "rejected",
    }
}

impl AttendanceStatus {
    /// 允许的状态迁移：not_started -> completed -> approved | rejected
    pub fn can_transition_to(&self, next: AttendanceStatus) -> bool {
        matches!(
            (self, next),
            (AttendanceStatus::NotStarted, AttendanceStatus::Completed)
                | (AttendanceStatus::Completed, AttendanceStatus::Approved)
                | (AttendanceStatus::Completed, AttendanceStatus::Rejected)
        )
    }
}

/// 课时结束后才能标记完成
pub fn can_mark_completed(
    class_end: chrono::DateTime<chrono::Utc>,
    now: chrono::DateTime<chrono::Utc>,
) -> bool {
    now >= class_end
}

// 课时考勤记录（按日历事件）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub calendar_event_id: i64,
    pub teacher_id: i64,
    pub status: AttendanceStatus,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub amount: f64,
    pub bonus: f64,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课次考勤记录（按课次），与课时考勤同步写入
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct LectureAttendanceRecord {
    pub id: i64,
    pub lecture_id: i64,
    pub teacher_id: i64,
    pub status: AttendanceStatus,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub amount: f64,
    pub bonus: f64,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_status_transitions() {
        use AttendanceStatus::*;
        assert!(NotStarted.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Approved));
        assert!(Completed.can_transition_to(Rejected));
        assert!(!NotStarted.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Completed));
    }

    #[test]
    fn test_cannot_complete_before_class_ends() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let future_end = Utc.with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap();
        let past_end = Utc.with_ymd_and_hms(2025, 3, 10, 8, 59, 0).unwrap();

        assert!(!can_mark_completed(future_end, now));
        assert!(can_mark_completed(past_end, now));
        assert!(can_mark_completed(now, now));
    }
}

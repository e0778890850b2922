use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 管理后台统计
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub student_count: i64,
    pub teacher_count: i64,
    pub course_count: i64,
    pub published_course_count: i64,
    pub active_enrollments: i64,
    pub pending_payments: i64,
    pub pending_attendance: i64,
    pub unpaid_salaries: i64,
    pub new_inquiries: i64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 选课状态
    pub enum EnrollmentStatus in "选课状态" => "../frontend/src/types/generated/enrollment.ts" {
        Pending = "pending",
        Active = "active",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 缴费审核状态
    pub enum PaymentStatus in "缴费状态" => "../frontend/src/types/generated/payment.ts" {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

// 学生缴费记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub method: Option<String>,
    pub reference: String,
    pub status: PaymentStatus,
    pub note: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    pub enum InquiryStatus in "咨询状态" => "../frontend/src/types/generated/inquiry.ts" {
        New = "new",
        Handled = "handled",
    }
}

// 官网咨询表单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct ContactInquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub course_id: Option<i64>,
    pub status: InquiryStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

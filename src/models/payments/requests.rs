use super::entities::PaymentStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreatePaymentRequest {
    pub student_id: Option<i64>,
    pub course_id: i64,
    pub amount: f64,
    pub method: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct ApprovePaymentRequest {
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct RejectPaymentRequest {
    pub reason: String,
}

// 缴费列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<PaymentStatus>,
}

// 新建缴费记录（存储层）
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: i64,
    pub course_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub method: Option<String>,
    pub reference: String,
    pub note: Option<String>,
}

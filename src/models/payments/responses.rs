use super::entities::Payment;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub payment: Payment,
    pub student_name: Option<String>,
    pub course_title: Option<String>,
    pub reviewer_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentListResponse {
    pub items: Vec<PaymentListItem>,
    pub pagination: PaginationInfo,
}

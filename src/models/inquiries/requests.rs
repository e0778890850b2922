use super::entities::InquiryStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct CreateInquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub course_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct InquiryListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<InquiryStatus>,
}

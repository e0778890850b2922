use super::entities::ContactInquiry;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct InquiryListResponse {
    pub items: Vec<ContactInquiry>,
    pub pagination: PaginationInfo,
}

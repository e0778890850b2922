use super::entities::SalaryPayment;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct SalaryListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub salary: SalaryPayment,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct SalaryListResponse {
    pub items: Vec<SalaryListItem>,
    pub pagination: PaginationInfo,
}

use super::entities::SalaryStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct SalaryListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub teacher_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<SalaryStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct RecalculateSalaryRequest {
    pub teacher_id: i64,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct MarkSalaryPaidRequest {
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct SalaryExportParams {
    pub teacher_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<SalaryStatus>,
}

// 工资列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct SalaryListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<SalaryStatus>,
}

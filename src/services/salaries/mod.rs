pub mod export;
pub mod get;
pub mod list;
pub mod pay;
pub mod recalculate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::salaries::requests::{
    MarkSalaryPaidRequest, RecalculateSalaryRequest, SalaryExportParams, SalaryListParams,
};
use crate::storage::Storage;

pub struct SalaryService {
    storage: Option<Arc<dyn Storage>>,
}

impl SalaryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    pub async fn list_salaries(
        &self,
        query: SalaryListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_salaries(self, query, request).await
    }

    pub async fn get_salary(
        &self,
        salary_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_salary(self, salary_id, request).await
    }

    // 按已审核考勤重新汇总某月工资
    pub async fn recalculate_salary(
        &self,
        recalc: RecalculateSalaryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        recalculate::recalculate_salary(self, recalc, request).await
    }

    pub async fn mark_salary_paid(
        &self,
        salary_id: i64,
        pay_data: MarkSalaryPaidRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        pay::mark_salary_paid(self, salary_id, pay_data, request).await
    }

    // 导出 CSV
    pub async fn export_salaries(
        &self,
        query: SalaryExportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_salaries(self, query, request).await
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::SalaryService;
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::ErrorCode;
use crate::models::salaries::{
    requests::{SalaryExportParams, SalaryListQuery},
    responses::SalaryListItem,
};
use crate::services::error_response;

const HEADERS: [&str; 10] = [
    "teacher_id",
    "teacher_name",
    "year",
    "month",
    "total_classes",
    "base_amount",
    "bonus_amount",
    "total_amount",
    "status",
    "paid_at",
];

/// 工资列表写为 CSV
pub(crate) fn salaries_to_csv(items: &[SalaryListItem], currency: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| LmsError::serialization(format!("CSV 写入失败: {e}"));

    let mut headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    headers.push("currency".to_string());
    writer.write_record(&headers).map_err(csv_err)?;

    for item in items {
        let salary = &item.salary;
        writer
            .write_record([
                salary.teacher_id.to_string(),
                item.teacher_name.clone().unwrap_or_default(),
                salary.year.to_string(),
                salary.month.to_string(),
                salary.total_classes.to_string(),
                format!("{:.2}", salary.base_amount),
                format!("{:.2}", salary.bonus_amount),
                format!("{:.2}", salary.total_amount),
                salary.status.to_string(),
                salary.paid_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                currency.to_string(),
            ])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| LmsError::serialization(format!("CSV 写入失败: {e}")))
}

pub async fn export_salaries(
    service: &SalaryService,
    params: SalaryExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query = SalaryListQuery {
        teacher_id: params.teacher_id,
        year: params.year,
        month: params.month,
        status: params.status,
        ..Default::default()
    };

    let body = match storage.list_salaries_for_export(query).await {
        Ok(items) => salaries_to_csv(&items, &AppConfig::get().salary.currency),
        Err(e) => Err(e),
    };

    match body {
        Ok(body) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"salaries.csv\"",
            ))
            .body(body)),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::salaries::entities::{SalaryPayment, SalaryStatus};

    #[test]
    fn test_salaries_to_csv() {
        let now = chrono::Utc::now();
        let items = vec![SalaryListItem {
            salary: SalaryPayment {
                id: 1,
                teacher_id: 3,
                year: 2025,
                month: 1,
                total_classes: 2,
                base_amount: 60.0,
                bonus_amount: 5.0,
                total_amount: 65.0,
                status: SalaryStatus::Pending,
                paid_at: None,
                paid_by: None,
                note: None,
                created_at: now,
                updated_at: now,
            },
            teacher_name: Some("Ada, L.".to_string()),
        }];

        let csv = String::from_utf8(salaries_to_csv(&items, "USD").unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("teacher_id,teacher_name,year,month,total_classes,base_amount,bonus_amount,total_amount,status,paid_at,currency")
        );
        assert_eq!(
            lines.next(),
            Some("3,\"Ada, L.\",2025,1,2,60.00,5.00,65.00,pending,,USD")
        );
        assert_eq!(lines.next(), None);
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::salaries::requests::{
    MarkSalaryPaidRequest, RecalculateSalaryRequest, SalaryExportParams, SalaryListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::SalaryService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SalaryService 实例
static SALARY_SERVICE: Lazy<SalaryService> = Lazy::new(SalaryService::new_lazy);

pub async fn list_salaries(
    req: HttpRequest,
    query: web::Query<SalaryListParams>,
) -> ActixResult<HttpResponse> {
    SALARY_SERVICE.list_salaries(query.into_inner(), &req).await
}

pub async fn get_salary(req: HttpRequest, salary_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SALARY_SERVICE.get_salary(salary_id.0, &req).await
}

pub async fn recalculate_salary(
    req: HttpRequest,
    recalc: web::Json<RecalculateSalaryRequest>,
) -> ActixResult<HttpResponse> {
    SALARY_SERVICE
        .recalculate_salary(recalc.into_inner(), &req)
        .await
}

pub async fn mark_salary_paid(
    req: HttpRequest,
    salary_id: SafeIDI64,
    pay_data: Option<web::Json<MarkSalaryPaidRequest>>,
) -> ActixResult<HttpResponse> {
    let pay_data = pay_data.map(|d| d.into_inner()).unwrap_or_default();
    SALARY_SERVICE
        .mark_salary_paid(salary_id.0, pay_data, &req)
        .await
}

pub async fn export_salaries(
    req: HttpRequest,
    query: web::Query<SalaryExportParams>,
) -> ActixResult<HttpResponse> {
    SALARY_SERVICE
        .export_salaries(query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_salary_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/salaries")
            .wrap(middlewares::RequireJWT)
            // 教师只能查看自己的工资（业务层处理）
            .service(
                web::resource("")
                    .route(web::get().to(list_salaries))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/export")
                    .route(web::get().to(export_salaries))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/recalculate")
                    .route(web::post().to(recalculate_salary))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            // /{id} 需在 /export、/recalculate 之后注册
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_salary))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/pay")
                    .route(web::post().to(mark_salary_paid))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}

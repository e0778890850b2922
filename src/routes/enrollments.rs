use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment_data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(enrollment_data.into_inner(), &req)
        .await
}

pub async fn get_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_enrollment(enrollment_id.0, &req).await
}

pub async fn update_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
    update_data: web::Json<UpdateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_enrollment(enrollment_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(enrollment_id.0, &req)
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 按角色限定范围（业务层处理）
                    .route(web::get().to(list_enrollments))
                    // 管理员直接报名，学生自助报名
                    .route(
                        web::post()
                            .to(create_enrollment)
                            .wrap(middlewares::RequireRole::new_any(&[
                                &UserRole::Admin,
                                &UserRole::Student,
                            ])),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_enrollment))
                    .route(
                        web::put()
                            .to(update_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}

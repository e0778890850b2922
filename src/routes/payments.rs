use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{
    ApprovePaymentRequest, CreatePaymentRequest, PaymentListParams, RejectPaymentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PaymentService 实例
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn create_payment(
    req: HttpRequest,
    payment_data: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .create_payment(payment_data.into_inner(), &req)
        .await
}

pub async fn get_payment(req: HttpRequest, payment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_payment(payment_id.0, &req).await
}

pub async fn approve_payment(
    req: HttpRequest,
    payment_id: SafeIDI64,
    approve_data: Option<web::Json<ApprovePaymentRequest>>,
) -> ActixResult<HttpResponse> {
    let approve_data = approve_data.map(|d| d.into_inner()).unwrap_or_default();
    PAYMENT_SERVICE
        .approve_payment(payment_id.0, approve_data, &req)
        .await
}

pub async fn reject_payment(
    req: HttpRequest,
    payment_id: SafeIDI64,
    reject_data: web::Json<RejectPaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .reject_payment(payment_id.0, reject_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(create_payment))
                    .wrap(middlewares::RequireRole::new_any(&[
                        &UserRole::Admin,
                        &UserRole::Student,
                    ])),
            )
            // 需在 /{id} 作用域之前注册
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_payment))
                    .wrap(middlewares::RequireRole::new_any(&[
                        &UserRole::Admin,
                        &UserRole::Student,
                    ])),
            )
            .service(
                web::scope("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/approve", web::post().to(approve_payment))
                    .route("/reject", web::post().to(reject_payment)),
            ),
    );
}

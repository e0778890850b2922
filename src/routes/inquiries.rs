use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::inquiries::requests::{CreateInquiryRequest, InquiryListParams};
use crate::models::users::entities::UserRole;
use crate::services::InquiryService;
use crate::utils::SafeIDI64;

// 懒加载的全局 InquiryService 实例
static INQUIRY_SERVICE: Lazy<InquiryService> = Lazy::new(InquiryService::new_lazy);

pub async fn create_inquiry(
    req: HttpRequest,
    inquiry: web::Json<CreateInquiryRequest>,
) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE
        .create_inquiry(inquiry.into_inner(), &req)
        .await
}

pub async fn list_inquiries(
    req: HttpRequest,
    query: web::Query<InquiryListParams>,
) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE.list_inquiries(query.into_inner(), &req).await
}

pub async fn mark_handled(req: HttpRequest, inquiry_id: SafeIDI64) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE.mark_handled(inquiry_id.0, &req).await
}

// 配置路由
pub fn configure_inquiry_routes(cfg: &mut web::ServiceConfig) {
    // 官网咨询表单，无需登录，按 IP 限流
    cfg.service(
        web::scope("/api/v1/public/inquiries")
            .wrap(RateLimit::inquiry())
            .route("", web::post().to(create_inquiry)),
    );

    cfg.service(
        web::scope("/api/v1/inquiries")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_inquiries))
            .route("/{id}/handled", web::post().to(mark_handled)),
    );
}

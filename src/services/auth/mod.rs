pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

// 身份信息由外部认证服务签发的令牌提供，这里只做查询
pub struct AuthService;

impl AuthService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 验证令牌
    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request).await
    }

    // 当前用户档案
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }
}

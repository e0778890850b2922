pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 管理后台统计，带冷却时间
    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }
}

//! 官网咨询存储操作

use super::SeaOrmStorage;
use crate::entity::contact_inquiries::{ActiveModel, Column, Entity as ContactInquiries};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    inquiries::{
        entities::{ContactInquiry, InquiryStatus},
        requests::CreateInquiryRequest,
        responses::InquiryListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_inquiry_impl(&self, req: CreateInquiryRequest) -> Result<ContactInquiry> {
        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            message: Set(req.message),
            course_id: Set(req.course_id),
            status: Set(InquiryStatus::New.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("保存咨询失败: {e}")))?;

        Ok(result.into_inquiry())
    }

    pub async fn list_inquiries_with_pagination_impl(
        &self,
        page: Option<i64>,
        size: Option<i64>,
        status: Option<InquiryStatus>,
    ) -> Result<InquiryListResponse> {
        let (page, size) = normalize_page(page, size);

        let mut select = ContactInquiries::find();
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询咨询总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询咨询列表失败: {e}")))?;

        Ok(InquiryListResponse {
            items: rows.into_iter().map(|m| m.into_inquiry()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn mark_inquiry_handled_impl(&self, id: i64) -> Result<Option<ContactInquiry>> {
        let Some(existing) = ContactInquiries::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(InquiryStatus::Handled.to_string());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新咨询失败: {e}")))?;

        Ok(Some(updated.into_inquiry()))
    }
}

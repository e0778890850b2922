//! 官网咨询实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contact_inquiries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub course_id: Option<i64>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_inquiry(self) -> crate::models::inquiries::entities::ContactInquiry {
        use crate::models::inquiries::entities::{ContactInquiry, InquiryStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        ContactInquiry {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            course_id: self.course_id,
            status: self
                .status
                .parse::<InquiryStatus>()
                .unwrap_or(InquiryStatus::New),
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

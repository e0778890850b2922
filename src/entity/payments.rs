//! 缴费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrollment_id: Option<i64>,
    pub amount: f64,
    pub method: Option<String>,
    #[sea_orm(unique)]
    pub reference: String,
    pub status: String,
    pub note: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        Payment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            enrollment_id: self.enrollment_id,
            amount: self.amount,
            method: self.method,
            reference: self.reference,
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            note: self.note,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at.map(timestamp_to_datetime),
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

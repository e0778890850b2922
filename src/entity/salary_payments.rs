//! 教师工资实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salary_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub year: i32,
    pub month: i32,
    pub total_classes: i32,
    pub base_amount: f64,
    pub bonus_amount: f64,
    pub total_amount: f64,
    pub status: String,
    pub paid_at: Option<i64>,
    pub paid_by: Option<i64>,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_salary(self) -> crate::models::salaries::entities::SalaryPayment {
        use crate::models::salaries::entities::{SalaryPayment, SalaryStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        SalaryPayment {
            id: self.id,
            teacher_id: self.teacher_id,
            year: self.year,
            month: self.month.max(0) as u32,
            total_classes: self.total_classes,
            base_amount: self.base_amount,
            bonus_amount: self.bonus_amount,
            total_amount: self.total_amount,
            status: self
                .status
                .parse::<SalaryStatus>()
                .unwrap_or(SalaryStatus::Pending),
            paid_at: self.paid_at.map(timestamp_to_datetime),
            paid_by: self.paid_by,
            note: self.note,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

//! 课次考勤实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lecture_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub lecture_id: i64,
    pub teacher_id: i64,
    pub status: String,
    pub completed_at: Option<i64>,
    pub amount: f64,
    pub bonus: f64,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lectures::Entity",
        from = "Column::LectureId",
        to = "super::lectures::Column::Id"
    )]
    Lecture,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::attendance::entities::LectureAttendanceRecord {
        use crate::models::attendance::entities::{AttendanceStatus, LectureAttendanceRecord};
        use crate::utils::datetime::timestamp_to_datetime;

        LectureAttendanceRecord {
            id: self.id,
            lecture_id: self.lecture_id,
            teacher_id: self.teacher_id,
            status: self
                .status
                .parse::<AttendanceStatus>()
                .unwrap_or(AttendanceStatus::NotStarted),
            completed_at: self.completed_at.map(timestamp_to_datetime),
            amount: self.amount,
            bonus: self.bonus,
            rejection_reason: self.rejection_reason,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at.map(timestamp_to_datetime),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

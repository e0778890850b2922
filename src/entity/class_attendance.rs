//! 课时考勤实体（按日历事件）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub calendar_event_id: i64,
    pub teacher_id: i64,
    pub status: String,
    pub completed_at: Option<i64>,
    pub amount: f64,
    pub bonus: f64,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::calendar_events::Entity",
        from = "Column::CalendarEventId",
        to = "super::calendar_events::Column::Id"
    )]
    CalendarEvent,
}

impl Related<super::calendar_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CalendarEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        AttendanceRecord {
            id: self.id,
            calendar_event_id: self.calendar_event_id,
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
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

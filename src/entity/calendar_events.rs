//! 日历事件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub all_day: bool,
    pub course_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub payment_amount: Option<f64>,
    pub color: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::calendar::entities::CalendarEvent {
        use crate::models::calendar::entities::{CalendarEvent, EventType};
        use crate::utils::datetime::timestamp_to_datetime;

        CalendarEvent {
            id: self.id,
            title: self.title,
            description: self.description,
            event_type: self
                .event_type
                .parse::<EventType>()
                .unwrap_or(EventType::Other),
            start_time: timestamp_to_datetime(self.start_time),
            end_time: self.end_time.map(timestamp_to_datetime),
            all_day: self.all_day,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            payment_amount: self.payment_amount,
            color: self.color,
            created_by: self.created_by,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }

    /// 课时结束时间（unix 秒）
    pub fn effective_end(&self) -> i64 {
        match self.end_time {
            Some(end) => end,
            None if self.all_day => self.start_time + 86_400,
            None => self.start_time,
        }
    }
}

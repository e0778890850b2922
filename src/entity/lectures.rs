//! 课次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lectures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: Option<i64>,
    #[sea_orm(unique)]
    pub calendar_event_id: Option<i64>,
    pub title: String,
    pub starts_at: i64,
    pub ends_at: i64,
    pub created_at: i64,
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
        belongs_to = "super::calendar_events::Entity",
        from = "Column::CalendarEventId",
        to = "super::calendar_events::Column::Id"
    )]
    CalendarEvent,
}

impl ActiveModelBehavior for ActiveModel {}


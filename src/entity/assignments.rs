//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub max_grade: f64,
    pub attachment_url: Option<String>,
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
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;
        use crate::utils::datetime::timestamp_to_datetime;

        Assignment {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date.map(timestamp_to_datetime),
            max_grade: self.max_grade,
            attachment_url: self.attachment_url,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

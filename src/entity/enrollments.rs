//! 选课实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub status: String,
    pub enrolled_at: i64,
    pub updated_at: i64,
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

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::enrollments::entities::Enrollment {
        use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        Enrollment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            status: self
                .status
                .parse::<EnrollmentStatus>()
                .unwrap_or(EnrollmentStatus::Pending),
            enrolled_at: timestamp_to_datetime(self.enrolled_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

//! 作业提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub status: String,
    pub is_late: bool,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub feedback_file_url: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::assignments::entities::Submission {
        use crate::models::assignments::entities::{Submission, SubmissionStatus};
        use crate::utils::datetime::timestamp_to_datetime;

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            file_url: self.file_url,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Submitted),
            is_late: self.is_late,
            grade: self.grade,
            feedback: self.feedback,
            feedback_file_url: self.feedback_file_url,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(timestamp_to_datetime),
            submitted_at: timestamp_to_datetime(self.submitted_at),
        }
    }
}

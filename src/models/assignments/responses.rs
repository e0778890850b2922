use super::entities::{Assignment, Submission};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub course_title: Option<String>,
    pub teacher_name: Option<String>,
    /// 学生视角：本人的提交
    pub my_submission: Option<Submission>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentListItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub course_title: Option<String>,
    pub student_ids: Vec<i64>,
}

// 被指派学生及其提交（可能为空）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentSubmissionRow {
    pub student_id: i64,
    pub student_name: Option<String>,
    pub submission: Option<Submission>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentSubmissionsResponse {
    pub assignment_id: i64,
    pub items: Vec<StudentSubmissionRow>,
}

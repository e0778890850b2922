use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub course_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// ISO 8601 或 datetime-local
    pub due_date: Option<String>,
    pub max_grade: Option<f64>,
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub max_grade: Option<f64>,
    pub attachment_url: Option<String>,
    /// 提供时整体替换目标学生
    pub student_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub feedback: Option<String>,
    pub feedback_file_url: Option<String>,
}

// 作业列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    /// 限定为该教师所授课程
    pub teacher_id: Option<i64>,
    /// 限定为该学生被指派的作业
    pub student_id: Option<i64>,
}

// 新建 / 更新作业（存储层）
#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    pub course_id: i64,
    pub teacher_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub max_grade: f64,
    pub attachment_url: Option<String>,
}

use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 课程列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub teacher_id: Option<i64>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub duration_weeks: Option<i32>,
    pub teacher_id: Option<i64>,
    pub is_published: Option<bool>,
}

// 更新课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub duration_weeks: Option<i32>,
    pub teacher_id: Option<i64>,
    /// 为 true 时清空授课教师
    pub unassign_teacher: Option<bool>,
    pub is_published: Option<bool>,
}

// 课程列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

use super::entities::Course;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 课程列表项（附带教师姓名）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: Course,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<CourseListItem>,
    pub pagination: PaginationInfo,
}

// 课程详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: Course,
    pub teacher_name: Option<String>,
    pub enrolled_count: i64,
}

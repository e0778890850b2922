use super::entities::EnrollmentStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

// 选课请求：学生省略 student_id 表示为自己报名
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: Option<i64>,
    pub course_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub status: EnrollmentStatus,
}

// 选课列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    /// 限定为该教师所授课程
    pub teacher_id: Option<i64>,
}

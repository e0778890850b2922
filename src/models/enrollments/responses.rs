use super::entities::Enrollment;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub student_name: Option<String>,
    pub course_title: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentListItem>,
    pub pagination: PaginationInfo,
}

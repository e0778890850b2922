pub mod create;
pub mod delete;
pub mod get;
pub mod grade;
pub mod list;
pub mod submissions;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmitAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 未指定满分时的默认值
pub const DEFAULT_MAX_GRADE: f64 = 100.0;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, assignment_id, request).await
    }

    pub async fn create_assignment(
        &self,
        assignment_data: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, assignment_data, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, update_data, request).await
    }

    // 删除作业及其指派与提交
    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }

    // 被指派学生及其提交
    pub async fn list_submissions(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, assignment_id, request).await
    }

    pub async fn submit_assignment(
        &self,
        assignment_id: i64,
        submission: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, assignment_id, submission, request).await
    }

    pub async fn get_my_submission(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::get_my_submission(self, assignment_id, request).await
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        grade_data: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, submission_id, grade_data, request).await
    }
}

/// 管理员可管理全部作业，教师仅限自己所授课程
pub(crate) async fn can_manage_course(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<bool> {
    match user.role {
        UserRole::Admin => Ok(true),
        UserRole::Teacher => Ok(storage
            .get_course_by_id(course_id)
            .await?
            .is_some_and(|course| course.teacher_id == Some(user.id))),
        UserRole::Student => Ok(false),
    }
}

/// 返回不在课程在读名单中的学生
pub(crate) async fn untargetable_students(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    student_ids: &[i64],
) -> Result<Vec<i64>> {
    let enrolled = storage.list_active_student_ids(course_id).await?;
    Ok(student_ids
        .iter()
        .copied()
        .filter(|id| !enrolled.contains(id))
        .collect())
}

pub(crate) fn validate_max_grade(max_grade: f64) -> std::result::Result<(), &'static str> {
    if !max_grade.is_finite() || max_grade <= 0.0 {
        return Err("Max grade must be greater than zero");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_grade() {
        assert!(validate_max_grade(DEFAULT_MAX_GRADE).is_ok());
        assert!(validate_max_grade(0.0).is_err());
        assert!(validate_max_grade(-5.0).is_err());
        assert!(validate_max_grade(f64::INFINITY).is_err());
    }
}

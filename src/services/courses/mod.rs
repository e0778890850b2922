pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::courses::{
    entities::Course,
    requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
    responses::CourseDetailResponse,
};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 官网：已发布课程列表
    pub async fn list_public_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_public_courses(self, query, request).await
    }

    // 官网：已发布课程详情
    pub async fn get_public_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_public_course(self, course_id, request).await
    }

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn create_course(
        &self,
        course_data: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course_data, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_data: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update_data, request).await
    }

    // 删除课程及其关联数据
    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }
}

/// 课程详情：附带教师姓名与在读人数
pub(crate) async fn course_detail(
    storage: &Arc<dyn Storage>,
    course: Course,
) -> Result<CourseDetailResponse> {
    let teacher_name = match course.teacher_id {
        Some(teacher_id) => storage
            .get_user_names(&[teacher_id])
            .await?
            .remove(&teacher_id),
        None => None,
    };
    let enrolled_count = storage.count_active_enrollments(course.id).await?;

    Ok(CourseDetailResponse {
        course,
        teacher_name,
        enrolled_count,
    })
}

/// 授课教师必须是教师或管理员账号
pub(crate) async fn check_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<std::result::Result<(), &'static str>> {
    Ok(match storage.get_user_by_id(teacher_id).await? {
        Some(user) if matches!(user.role, UserRole::Teacher | UserRole::Admin) => Ok(()),
        Some(_) => Err("Assigned user is not a teacher"),
        None => Err("Teacher not found"),
    })
}

pub(crate) fn validate_course_fields(
    title: Option<&str>,
    price: Option<f64>,
    duration_weeks: Option<i32>,
) -> std::result::Result<(), &'static str> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err("Course title cannot be empty");
    }
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err("Course price must be a non-negative number");
    }
    if duration_weeks.is_some_and(|w| w <= 0) {
        return Err("Duration must be at least one week");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_course_fields() {
        assert!(validate_course_fields(Some("Piano"), Some(99.0), Some(8)).is_ok());
        assert!(validate_course_fields(None, None, None).is_ok());
        assert!(validate_course_fields(Some("  "), None, None).is_err());
        assert!(validate_course_fields(None, Some(-1.0), None).is_err());
        assert!(validate_course_fields(None, Some(f64::NAN), None).is_err());
        assert!(validate_course_fields(None, None, Some(0)).is_err());
    }
}

pub mod create;
pub mod delete;
pub mod list;
pub mod update;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{LmsError, Result};
use crate::models::calendar::requests::{
    CalendarEventRequest, CalendarListParams, EventDraft, UpdateCalendarEventRequest,
};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

pub use validate::build_event_draft;

pub struct CalendarService {
    storage: Option<Arc<dyn Storage>>,
}

impl CalendarService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(&self.storage, request)
    }

    // 时间窗口内当前用户可见的事件
    pub async fn list_events(
        &self,
        query: CalendarListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_events(self, query, request).await
    }

    pub async fn get_event(&self, event_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_event(self, event_id, request).await
    }

    pub async fn create_event(
        &self,
        event_data: CalendarEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_event(self, event_data, request).await
    }

    pub async fn update_event(
        &self,
        event_id: i64,
        event_data: UpdateCalendarEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_event(self, event_id, event_data, request).await
    }

    // 删除事件及其考勤、课次
    pub async fn delete_event(
        &self,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_event(self, event_id, request).await
    }
}

/// 事件引用的课程、教师必须存在
pub(crate) async fn check_references(storage: &Arc<dyn Storage>, draft: &EventDraft) -> Result<()> {
    if let Some(course_id) = draft.course_id
        && storage.get_course_by_id(course_id).await?.is_none()
    {
        return Err(LmsError::not_found(format!("Course not found: {course_id}")));
    }

    if let Some(teacher_id) = draft.teacher_id {
        match storage.get_user_by_id(teacher_id).await? {
            Some(user) if matches!(user.role, UserRole::Teacher | UserRole::Admin) => {}
            Some(_) => {
                return Err(LmsError::validation("Assigned user is not a teacher"));
            }
            None => return Err(LmsError::not_found(format!("Teacher not found: {teacher_id}"))),
        }
    }

    Ok(())
}

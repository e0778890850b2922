//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::{
    assignment_students, assignments, calendar_events, class_attendance, enrollments,
    lecture_attendance, lectures, payments, submissions,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListItem, CourseListResponse},
    },
    enrollments::EnrollmentStatus,
};
use crate::utils::escape_like_pattern;
use chrono::FixedOffset;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            level: Set(req.level),
            price: Set(req.price.unwrap_or(0.0)),
            duration_weeks: Set(req.duration_weeks),
            teacher_id: Set(req.teacher_id),
            is_published: Set(req.is_published.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程，附带教师姓名
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Courses::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(published) = query.published {
            select = select.filter(Column::IsPublished.eq(published));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程列表失败: {e}")))?;

        let teacher_ids: Vec<i64> = courses.iter().filter_map(|c| c.teacher_id).collect();
        let teacher_names = self.user_names(&self.db, &teacher_ids).await?;

        let items = courses
            .into_iter()
            .map(|m| {
                let teacher_name = m.teacher_id.and_then(|id| teacher_names.get(&id).cloned());
                CourseListItem {
                    course: m.into_course(),
                    teacher_name,
                }
            })
            .collect();

        Ok(CourseListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(level) = update.level {
            model.level = Set(Some(level));
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if let Some(duration_weeks) = update.duration_weeks {
            model.duration_weeks = Set(Some(duration_weeks));
        }
        if update.unassign_teacher.unwrap_or(false) {
            model.teacher_id = Set(None);
        } else if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(is_published) = update.is_published {
            model.is_published = Set(is_published);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 删除课程
    ///
    /// 同一事务内删除选课、缴费、作业（含指派与提交）、课次（含考勤）
    /// 以及关联的日历事件（含考勤），并重新汇总其中已审核课时所在月份的工资；
    /// 任一月份已发放则拒绝删除。
    pub async fn delete_course_impl(&self, id: i64, offset: FixedOffset) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        // 课程下已审核课时所在月份，删除后重新汇总
        let events = calendar_events::Entity::find()
            .filter(calendar_events::Column::CourseId.eq(id))
            .all(&txn)
            .await?;
        let months = self.approved_months(&txn, &events, &offset).await?;
        for key in &months {
            self.ensure_salary_open(&txn, *key).await?;
        }

        let assignment_ids: Vec<i64> = assignments::Entity::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::CourseId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        if !assignment_ids.is_empty() {
            submissions::Entity::delete_many()
                .filter(submissions::Column::AssignmentId.is_in(assignment_ids.clone()))
                .exec(&txn)
                .await?;
            assignment_students::Entity::delete_many()
                .filter(assignment_students::Column::AssignmentId.is_in(assignment_ids.clone()))
                .exec(&txn)
                .await?;
            assignments::Entity::delete_many()
                .filter(assignments::Column::Id.is_in(assignment_ids))
                .exec(&txn)
                .await?;
        }

        let lecture_ids: Vec<i64> = lectures::Entity::find()
            .select_only()
            .column(lectures::Column::Id)
            .filter(lectures::Column::CourseId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        if !lecture_ids.is_empty() {
            lecture_attendance::Entity::delete_many()
                .filter(lecture_attendance::Column::LectureId.is_in(lecture_ids.clone()))
                .exec(&txn)
                .await?;
            lectures::Entity::delete_many()
                .filter(lectures::Column::Id.is_in(lecture_ids))
                .exec(&txn)
                .await?;
        }

        let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        if !event_ids.is_empty() {
            class_attendance::Entity::delete_many()
                .filter(class_attendance::Column::CalendarEventId.is_in(event_ids.clone()))
                .exec(&txn)
                .await?;
            calendar_events::Entity::delete_many()
                .filter(calendar_events::Column::Id.is_in(event_ids))
                .exec(&txn)
                .await?;
        }

        payments::Entity::delete_many()
            .filter(payments::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;

        let result = Courses::delete_by_id(id).exec(&txn).await?;

        let now = chrono::Utc::now().timestamp();
        for (teacher_id, year, month) in months {
            self.refresh_salary(&txn, teacher_id, year, month, &offset, now)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程在读人数
    pub async fn count_active_enrollments_impl(&self, course_id: i64) -> Result<i64> {
        let count = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(count as i64)
    }
}

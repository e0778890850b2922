//! 选课存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::{EnrollmentListItem, EnrollmentListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建选课记录，同一学生同一课程只允许一条
    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        if self.get_enrollment_impl(student_id, course_id).await?.is_some() {
            return Err(LmsError::conflict("该学生已报名此课程"));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            status: Set(status.to_string()),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建选课记录失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出选课记录，附带学生姓名与课程名
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Enrollments::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            let course_ids: Vec<i64> = Courses::find()
                .select_only()
                .column(CourseColumn::Id)
                .filter(CourseColumn::TeacherId.eq(teacher_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(Column::CourseId.is_in(course_ids));
        }

        select = select.order_by_desc(Column::EnrolledAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课列表失败: {e}")))?;

        let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();
        let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
        let student_names = self.user_names(&self.db, &student_ids).await?;
        let course_titles = self.course_titles(&self.db, &course_ids).await?;

        let items = rows
            .into_iter()
            .map(|m| EnrollmentListItem {
                student_name: student_names.get(&m.student_id).cloned(),
                course_title: course_titles.get(&m.course_id).cloned(),
                enrollment: m.into_enrollment(),
            })
            .collect();

        Ok(EnrollmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新选课状态失败: {e}")))?;

        self.get_enrollment_by_id_impl(id).await
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除选课记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生在读课程 ID
    pub async fn list_active_course_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        let ids = Enrollments::find()
            .select_only()
            .column(Column::CourseId)
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询在读课程失败: {e}")))?;

        Ok(ids)
    }

    /// 课程在读学生 ID
    pub async fn list_active_student_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        let ids = Enrollments::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询在读学生失败: {e}")))?;

        Ok(ids)
    }
}

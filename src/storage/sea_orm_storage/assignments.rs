//! 作业与提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::lookups::unique_ids;
use crate::entity::assignment_students::{
    ActiveModel as TargetActiveModel, Column as TargetColumn, Entity as AssignmentStudents,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submissions,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, Submission, SubmissionStatus},
        requests::{AssignmentDraft, AssignmentListQuery},
        responses::{AssignmentListItem, AssignmentListResponse, StudentSubmissionRow},
    },
    common::pagination::normalize_page,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业并写入指派学生
    pub async fn create_assignment_impl(
        &self,
        draft: AssignmentDraft,
        student_ids: Vec<i64>,
    ) -> Result<Assignment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            course_id: Set(draft.course_id),
            teacher_id: Set(draft.teacher_id),
            title: Set(draft.title),
            description: Set(draft.description),
            due_date: Set(draft.due_date),
            max_grade: Set(draft.max_grade),
            attachment_url: Set(draft.attachment_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        replace_targets(&txn, created.id, &student_ids, now).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(created.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出作业；学生视角附带本人提交
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Assignments::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
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
        if let Some(student_id) = query.student_id {
            let assignment_ids: Vec<i64> = AssignmentStudents::find()
                .select_only()
                .column(TargetColumn::AssignmentId)
                .filter(TargetColumn::StudentId.eq(student_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(Column::Id.is_in(assignment_ids));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
        let teacher_ids: Vec<i64> = rows.iter().filter_map(|r| r.teacher_id).collect();
        let course_titles = self.course_titles(&self.db, &course_ids).await?;
        let teacher_names = self.user_names(&self.db, &teacher_ids).await?;

        let mut my_submissions: HashMap<i64, Submission> = HashMap::new();
        if let Some(student_id) = query.student_id
            && !rows.is_empty()
        {
            let ids = unique_ids(rows.iter().map(|r| r.id));
            let submissions = Submissions::find()
                .filter(SubmissionColumn::StudentId.eq(student_id))
                .filter(SubmissionColumn::AssignmentId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;
            my_submissions = submissions
                .into_iter()
                .map(|s| (s.assignment_id, s.into_submission()))
                .collect();
        }

        let items = rows
            .into_iter()
            .map(|m| AssignmentListItem {
                course_title: course_titles.get(&m.course_id).cloned(),
                teacher_name: m.teacher_id.and_then(|id| teacher_names.get(&id).cloned()),
                my_submission: my_submissions.remove(&m.id),
                assignment: m.into_assignment(),
            })
            .collect();

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新作业；`student_ids` 为 Some 时整体替换指派学生
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        draft: AssignmentDraft,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Option<Assignment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Assignments::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.course_id = Set(draft.course_id);
        model.teacher_id = Set(draft.teacher_id);
        model.title = Set(draft.title);
        model.description = Set(draft.description);
        model.due_date = Set(draft.due_date);
        model.max_grade = Set(draft.max_grade);
        model.attachment_url = Set(draft.attachment_url);
        model.updated_at = Set(now);

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        if let Some(student_ids) = student_ids {
            replace_targets(&txn, id, &student_ids, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(updated.into_assignment()))
    }

    /// 删除作业及其提交、指派
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await?;
        AssignmentStudents::delete_many()
            .filter(TargetColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await?;
        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_assignment_student_ids_impl(&self, assignment_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = AssignmentStudents::find()
            .select_only()
            .column(TargetColumn::StudentId)
            .filter(TargetColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(TargetColumn::StudentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业指派失败: {e}")))?;
        Ok(ids)
    }

    /// 每个被指派学生一行，未提交的 `submission` 为空
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionRow>> {
        let student_ids = self.list_assignment_student_ids_impl(assignment_id).await?;

        let mut submissions: HashMap<i64, Submission> = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
            .into_iter()
            .map(|s| (s.student_id, s.into_submission()))
            .collect();

        let names = self.user_names(&self.db, &student_ids).await?;

        Ok(student_ids
            .into_iter()
            .map(|student_id| StudentSubmissionRow {
                student_id,
                student_name: names.get(&student_id).cloned(),
                submission: submissions.remove(&student_id),
            })
            .collect())
    }

    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 提交作业，已有未批改的提交时替换内容
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        file_url: Option<String>,
        is_late: bool,
    ) -> Result<Submission> {
        let existing = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await?;

        let now = chrono::Utc::now().timestamp();
        let saved = match existing {
            Some(row) if row.status == SubmissionStatus::Graded.as_str() => {
                return Err(LmsError::invalid_state("作业已批改，不能重新提交"));
            }
            Some(row) => {
                let mut model: SubmissionActiveModel = row.into();
                model.content = Set(content);
                model.file_url = Set(file_url);
                model.is_late = Set(is_late);
                model.submitted_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                SubmissionActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(content),
                    file_url: Set(file_url),
                    status: Set(SubmissionStatus::Submitted.to_string()),
                    is_late: Set(is_late),
                    submitted_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("保存提交失败: {e}")))?;

        Ok(saved.into_submission())
    }

    /// 批改提交
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grader_id: i64,
        grade: f64,
        feedback: Option<String>,
        feedback_file_url: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: SubmissionActiveModel = existing.into();
        model.status = Set(SubmissionStatus::Graded.to_string());
        model.grade = Set(Some(grade));
        model.feedback = Set(feedback);
        model.feedback_file_url = Set(feedback_file_url);
        model.graded_by = Set(Some(grader_id));
        model.graded_at = Set(Some(now));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批改作业失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }
}

/// 整体替换作业的指派学生
async fn replace_targets<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    student_ids: &[i64],
    now: i64,
) -> Result<()> {
    AssignmentStudents::delete_many()
        .filter(TargetColumn::AssignmentId.eq(assignment_id))
        .exec(conn)
        .await?;

    let ids = unique_ids(student_ids.iter().copied());
    if ids.is_empty() {
        return Ok(());
    }

    let targets = ids.into_iter().map(|student_id| TargetActiveModel {
        assignment_id: Set(assignment_id),
        student_id: Set(student_id),
        assigned_at: Set(now),
        ..Default::default()
    });
    AssignmentStudents::insert_many(targets)
        .exec(conn)
        .await
        .map_err(|e| LmsError::database_operation(format!("写入作业指派失败: {e}")))?;
    Ok(())
}

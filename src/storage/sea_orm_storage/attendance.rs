//! 课时考勤存储操作
//!
//! `class_attendance`（按日历事件）与 `lecture_attendance`（按课次）两张表
//! 始终在同一事务内同步写入。

use super::SeaOrmStorage;
use crate::entity::calendar_events::{Column as EventColumn, Entity as CalendarEvents};
use crate::entity::class_attendance::{ActiveModel, Column, Entity as ClassAttendance, Model};
use crate::entity::lecture_attendance::{
    ActiveModel as LectureAttendanceActiveModel, Column as LectureAttendanceColumn,
    Entity as LectureAttendance,
};
use crate::entity::lectures::{
    ActiveModel as LectureActiveModel, Column as LectureColumn, Entity as Lectures,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::{AttendanceListQuery, AttendanceReview},
        responses::{AttendanceListItem, AttendanceListResponse, AttendanceSyncResponse},
    },
    common::pagination::normalize_page,
};
use crate::utils::datetime::{timestamp_to_datetime, year_month_of};
use chrono::FixedOffset;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 写入考勤表的字段
struct AttendanceChange {
    teacher_id: i64,
    status: AttendanceStatus,
    completed_at: Option<i64>,
    amount: Option<f64>,
    bonus: Option<f64>,
    rejection_reason: Option<String>,
    reviewed_by: Option<i64>,
    reviewed_at: Option<i64>,
}

impl SeaOrmStorage {
    /// 教师标记课时完成
    pub async fn mark_class_completed_impl(
        &self,
        event_id: i64,
        teacher_id: i64,
        amount: f64,
        completed_at: i64,
    ) -> Result<AttendanceSyncResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let event = CalendarEvents::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("日历事件不存在: {event_id}")))?;

        let existing = ClassAttendance::find()
            .filter(Column::CalendarEventId.eq(event_id))
            .one(&txn)
            .await?;

        let change = AttendanceChange {
            teacher_id,
            status: AttendanceStatus::Completed,
            completed_at: Some(completed_at),
            amount: Some(amount),
            bonus: Some(0.0),
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
        };

        let class_row = match existing {
            Some(row) => {
                let status = row
                    .status
                    .parse::<AttendanceStatus>()
                    .unwrap_or(AttendanceStatus::NotStarted);
                if status != AttendanceStatus::Completed
                    && !status.can_transition_to(AttendanceStatus::Completed)
                {
                    return Err(LmsError::invalid_state(format!(
                        "课时考勤已审核（{status}），不能重复标记"
                    )));
                }
                let mut model: ActiveModel = row.into();
                apply_class_change(&mut model, &change, completed_at);
                model.update(&txn).await?
            }
            None => {
                let mut model = ActiveModel {
                    calendar_event_id: Set(event_id),
                    created_at: Set(completed_at),
                    ..Default::default()
                };
                apply_class_change(&mut model, &change, completed_at);
                model.insert(&txn).await?
            }
        };

        // 课次：按事件查找，不存在则创建
        let lecture = match Lectures::find()
            .filter(LectureColumn::CalendarEventId.eq(event_id))
            .one(&txn)
            .await?
        {
            Some(lecture) => Some(lecture),
            None => match event.course_id {
                Some(course_id) => Some(
                    LectureActiveModel {
                        course_id: Set(course_id),
                        teacher_id: Set(Some(teacher_id)),
                        calendar_event_id: Set(Some(event_id)),
                        title: Set(event.title.clone()),
                        starts_at: Set(event.start_time),
                        ends_at: Set(event.effective_end()),
                        created_at: Set(completed_at),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?,
                ),
                None => None,
            },
        };

        let lecture_row = match lecture {
            Some(lecture) => Some(
                self.write_lecture_attendance(&txn, lecture.id, &change, completed_at)
                    .await?,
            ),
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("标记课时完成失败: {e}")))?;

        Ok(AttendanceSyncResponse {
            class_attendance: class_row.into_record(),
            lecture_attendance: lecture_row.map(|r| r.into_record()),
        })
    }

    pub async fn get_attendance_by_id_impl(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let result = ClassAttendance::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_record()))
    }

    /// 分页列出考勤，附带事件、课程、教师与审核人信息
    pub async fn list_attendance_with_pagination_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ClassAttendance::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some((from, to)) = query.range {
            select = select
                .inner_join(CalendarEvents)
                .filter(EventColumn::StartTime.gte(from))
                .filter(EventColumn::StartTime.lt(to));
        }
        select = select.order_by_desc(Column::UpdatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤列表失败: {e}")))?;

        let event_ids: Vec<i64> = rows.iter().map(|r| r.calendar_event_id).collect();
        let events = self.events_by_id(&self.db, &event_ids).await?;
        let course_ids: Vec<i64> = events.values().filter_map(|e| e.course_id).collect();
        let titles = self.course_titles(&self.db, &course_ids).await?;
        let user_ids: Vec<i64> = rows
            .iter()
            .flat_map(|r| std::iter::once(r.teacher_id).chain(r.reviewed_by))
            .collect();
        let names = self.user_names(&self.db, &user_ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let event = events.get(&row.calendar_event_id);
                let course_id = event.and_then(|e| e.course_id);
                AttendanceListItem {
                    event_title: event.map(|e| e.title.clone()),
                    course_id,
                    course_title: course_id.and_then(|id| titles.get(&id).cloned()),
                    teacher_name: names.get(&row.teacher_id).cloned(),
                    reviewer_name: row.reviewed_by.and_then(|id| names.get(&id).cloned()),
                    class_start: event.map(|e| timestamp_to_datetime(e.start_time)),
                    class_end: event.map(|e| timestamp_to_datetime(e.effective_end())),
                    record: row.into_record(),
                }
            })
            .collect();

        Ok(AttendanceListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 审核考勤
    ///
    /// 只有 completed 状态可以审核；通过时在同一事务内刷新教师当月工资，
    /// 当月工资已发放则拒绝。
    pub async fn review_attendance_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        review: AttendanceReview,
        offset: FixedOffset,
    ) -> Result<AttendanceSyncResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let row = ClassAttendance::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("考勤记录不存在: {id}")))?;

        let status = row
            .status
            .parse::<AttendanceStatus>()
            .unwrap_or(AttendanceStatus::NotStarted);
        let next = match review {
            AttendanceReview::Approve { .. } => AttendanceStatus::Approved,
            AttendanceReview::Reject { .. } => AttendanceStatus::Rejected,
        };
        if !status.can_transition_to(next) {
            return Err(LmsError::invalid_state(format!(
                "考勤状态为 {status}，只能审核已完成的课时"
            )));
        }

        let event = CalendarEvents::find_by_id(row.calendar_event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| LmsError::not_found("考勤对应的日历事件不存在"))?;
        let (year, month) = year_month_of(event.start_time, &offset);

        let now = chrono::Utc::now().timestamp();
        let teacher_id = row.teacher_id;
        let completed_at = row.completed_at;

        let change = match review {
            AttendanceReview::Approve { bonus } => {
                if self
                    .is_salary_paid(&txn, teacher_id, year, month)
                    .await?
                {
                    return Err(LmsError::conflict(format!(
                        "{year}-{month:02} 工资已发放，不能再审核该月课时"
                    )));
                }
                AttendanceChange {
                    teacher_id,
                    status: AttendanceStatus::Approved,
                    completed_at,
                    amount: None,
                    bonus: Some(bonus),
                    rejection_reason: None,
                    reviewed_by: Some(reviewer_id),
                    reviewed_at: Some(now),
                }
            }
            AttendanceReview::Reject { reason } => AttendanceChange {
                teacher_id,
                status: AttendanceStatus::Rejected,
                completed_at,
                amount: None,
                bonus: None,
                rejection_reason: Some(reason),
                reviewed_by: Some(reviewer_id),
                reviewed_at: Some(now),
            },
        };

        let mut model: ActiveModel = row.into();
        apply_class_change(&mut model, &change, now);
        let class_row = model.update(&txn).await?;

        let lecture_row = match Lectures::find()
            .filter(LectureColumn::CalendarEventId.eq(event.id))
            .one(&txn)
            .await?
        {
            Some(lecture) => Some(
                self.write_lecture_attendance(&txn, lecture.id, &change, now)
                    .await?,
            ),
            None => None,
        };

        if change.status == AttendanceStatus::Approved {
            self.refresh_salary(&txn, teacher_id, year, month, &offset, now)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("审核考勤失败: {e}")))?;

        Ok(AttendanceSyncResponse {
            class_attendance: class_row.into_record(),
            lecture_attendance: lecture_row.map(|r| r.into_record()),
        })
    }

    /// 课次考勤：存在则更新，否则插入
    async fn write_lecture_attendance<C: ConnectionTrait>(
        &self,
        conn: &C,
        lecture_id: i64,
        change: &AttendanceChange,
        now: i64,
    ) -> Result<crate::entity::lecture_attendance::Model> {
        let existing = LectureAttendance::find()
            .filter(LectureAttendanceColumn::LectureId.eq(lecture_id))
            .one(conn)
            .await?;

        let is_new = existing.is_none();
        let mut model: LectureAttendanceActiveModel = match existing {
            Some(row) => row.into(),
            None => LectureAttendanceActiveModel {
                lecture_id: Set(lecture_id),
                amount: Set(change.amount.unwrap_or(0.0)),
                bonus: Set(0.0),
                ..Default::default()
            },
        };

        model.teacher_id = Set(change.teacher_id);
        model.status = Set(change.status.to_string());
        model.completed_at = Set(change.completed_at);
        if let Some(amount) = change.amount {
            model.amount = Set(amount);
        }
        if let Some(bonus) = change.bonus {
            model.bonus = Set(bonus);
        }
        model.rejection_reason = Set(change.rejection_reason.clone());
        model.reviewed_by = Set(change.reviewed_by);
        model.reviewed_at = Set(change.reviewed_at);
        model.updated_at = Set(now);

        let saved = if is_new {
            model.insert(conn).await?
        } else {
            model.update(conn).await?
        };
        Ok(saved)
    }

    /// 按状态统计课时考勤
    pub(crate) async fn count_attendance_with_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        status: AttendanceStatus,
    ) -> Result<i64> {
        let count = ClassAttendance::find()
            .filter(Column::Status.eq(status.to_string()))
            .count(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计考勤失败: {e}")))?;
        Ok(count as i64)
    }

    /// 教师某月已审核通过的考勤 (课时费, 奖金)
    pub(crate) async fn approved_attendance_amounts<C: ConnectionTrait>(
        &self,
        conn: &C,
        teacher_id: i64,
        range: (i64, i64),
    ) -> Result<Vec<(f64, f64)>> {
        let rows: Vec<Model> = ClassAttendance::find()
            .inner_join(CalendarEvents)
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Status.eq(AttendanceStatus::Approved.to_string()))
            .filter(EventColumn::StartTime.gte(range.0))
            .filter(EventColumn::StartTime.lt(range.1))
            .all(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询已审核考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|r| (r.amount, r.bonus)).collect())
    }
}

fn apply_class_change(model: &mut ActiveModel, change: &AttendanceChange, now: i64) {
    model.teacher_id = Set(change.teacher_id);
    model.status = Set(change.status.to_string());
    model.completed_at = Set(change.completed_at);
    if let Some(amount) = change.amount {
        model.amount = Set(amount);
    }
    if let Some(bonus) = change.bonus {
        model.bonus = Set(bonus);
    }
    model.rejection_reason = Set(change.rejection_reason.clone());
    model.reviewed_by = Set(change.reviewed_by);
    model.reviewed_at = Set(change.reviewed_at);
    model.updated_at = Set(now);
}

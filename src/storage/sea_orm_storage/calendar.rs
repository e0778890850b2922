//! 日历事件存储操作

use std::collections::{BTreeSet, HashMap};

use super::SeaOrmStorage;
use super::salaries::SalaryMonth;
use crate::entity::calendar_events::{ActiveModel, Column, Entity as CalendarEvents, Model};
use crate::entity::class_attendance::{
    ActiveModel as ClassAttendanceActiveModel, Column as ClassAttendanceColumn,
    Entity as ClassAttendance, Model as ClassAttendanceModel,
};
use crate::entity::lecture_attendance::{
    ActiveModel as LectureAttendanceActiveModel, Column as LectureAttendanceColumn,
    Entity as LectureAttendance,
};
use crate::entity::lectures::{
    ActiveModel as LectureActiveModel, Column as LectureColumn, Entity as Lectures,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    attendance::AttendanceStatus,
    calendar::{
        entities::{CalendarEvent, EventType},
        requests::{CalendarQuery, EventDraft, EventVisibility},
    },
};
use crate::utils::datetime::year_month_of;
use chrono::FixedOffset;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建事件；课程类事件同时创建对应课次
    pub async fn create_event_impl(
        &self,
        draft: EventDraft,
        created_by: i64,
    ) -> Result<CalendarEvent> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let event = ActiveModel {
            title: Set(draft.title),
            description: Set(draft.description),
            event_type: Set(draft.event_type.to_string()),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            all_day: Set(draft.all_day),
            course_id: Set(draft.course_id),
            teacher_id: Set(draft.teacher_id),
            payment_amount: Set(draft.payment_amount),
            color: Set(draft.color),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建日历事件失败: {e}")))?;

        self.sync_lecture(&txn, &event, now).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("创建日历事件失败: {e}")))?;

        Ok(event.into_event())
    }

    pub async fn get_event_by_id_impl(&self, id: i64) -> Result<Option<CalendarEvent>> {
        let result = CalendarEvents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询日历事件失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// 查询与时间窗口 `[from, to)` 有交集的事件
    pub async fn list_events_impl(&self, query: CalendarQuery) -> Result<Vec<CalendarEvent>> {
        let overlaps = Condition::all()
            .add(Column::StartTime.lt(query.to))
            .add(
                Condition::any().add(Column::EndTime.gte(query.from)).add(
                    Condition::all()
                        .add(Column::EndTime.is_null())
                        .add(Column::StartTime.gte(query.from)),
                ),
            );

        let mut select = CalendarEvents::find().filter(overlaps);

        if let Some(event_type) = query.event_type {
            select = select.filter(Column::EventType.eq(event_type.to_string()));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        select = match query.visibility {
            EventVisibility::All => select,
            EventVisibility::Teacher(teacher_id) => select.filter(
                Condition::any()
                    .add(Column::TeacherId.eq(teacher_id))
                    .add(Column::TeacherId.is_null()),
            ),
            EventVisibility::Courses(course_ids) => select.filter(
                Condition::any()
                    .add(Column::CourseId.is_in(course_ids))
                    .add(Column::CourseId.is_null()),
            ),
        };

        let events = select
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询日历事件失败: {e}")))?;

        Ok(events.into_iter().map(|m| m.into_event()).collect())
    }

    /// 整体更新事件并同步课次
    ///
    /// 已审核通过的课时改到其他月份或改派教师时，新旧两个月的工资一并刷新；
    /// 其中任一月份已发放则拒绝。
    pub async fn update_event_impl(
        &self,
        id: i64,
        draft: EventDraft,
        offset: FixedOffset,
    ) -> Result<Option<CalendarEvent>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = CalendarEvents::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        let attendance = ClassAttendance::find()
            .filter(ClassAttendanceColumn::CalendarEventId.eq(id))
            .one(&txn)
            .await?;
        let month_before = approved_month(&existing, attendance.as_ref(), &offset);

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.title = Set(draft.title);
        model.description = Set(draft.description);
        model.event_type = Set(draft.event_type.to_string());
        model.start_time = Set(draft.start_time);
        model.end_time = Set(draft.end_time);
        model.all_day = Set(draft.all_day);
        model.course_id = Set(draft.course_id);
        model.teacher_id = Set(draft.teacher_id);
        model.payment_amount = Set(draft.payment_amount);
        model.color = Set(draft.color);
        model.updated_at = Set(now);

        let event = model
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新日历事件失败: {e}")))?;

        self.sync_lecture(&txn, &event, now).await?;

        // 改派教师时考勤随事件转给新教师
        let attendance = match (attendance, event.teacher_id) {
            (Some(row), Some(teacher_id)) if row.teacher_id != teacher_id => Some(
                self.reassign_attendance(&txn, row, teacher_id, now)
                    .await?,
            ),
            (row, _) => row,
        };
        let month_after = approved_month(&event, attendance.as_ref(), &offset);

        if month_before != month_after {
            let months: Vec<SalaryMonth> = month_before.into_iter().chain(month_after).collect();
            for key in &months {
                self.ensure_salary_open(&txn, *key).await?;
            }
            for (teacher_id, year, month) in months {
                self.refresh_salary(&txn, teacher_id, year, month, &offset, now)
                    .await?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("更新日历事件失败: {e}")))?;

        Ok(Some(event.into_event()))
    }

    /// 删除事件及其考勤、课次
    ///
    /// 已审核通过的课时被删除后刷新对应月份工资；该月已发放则拒绝删除。
    pub async fn delete_event_impl(&self, id: i64, offset: FixedOffset) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(event) = CalendarEvents::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };
        let months = self
            .approved_months(&txn, std::slice::from_ref(&event), &offset)
            .await?;
        for key in &months {
            self.ensure_salary_open(&txn, *key).await?;
        }

        ClassAttendance::delete_many()
            .filter(ClassAttendanceColumn::CalendarEventId.eq(id))
            .exec(&txn)
            .await?;

        if let Some(lecture) = Lectures::find()
            .filter(LectureColumn::CalendarEventId.eq(id))
            .one(&txn)
            .await?
        {
            LectureAttendance::delete_many()
                .filter(LectureAttendanceColumn::LectureId.eq(lecture.id))
                .exec(&txn)
                .await?;
            Lectures::delete_by_id(lecture.id).exec(&txn).await?;
        }

        let result = CalendarEvents::delete_by_id(id).exec(&txn).await?;

        let now = chrono::Utc::now().timestamp();
        for (teacher_id, year, month) in months {
            self.refresh_salary(&txn, teacher_id, year, month, &offset, now)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("删除日历事件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 一批事件上已审核通过的课时所属的工资月份
    pub(crate) async fn approved_months<C: ConnectionTrait>(
        &self,
        conn: &C,
        events: &[Model],
        offset: &FixedOffset,
    ) -> Result<BTreeSet<SalaryMonth>> {
        if events.is_empty() {
            return Ok(BTreeSet::new());
        }

        let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        let rows: HashMap<i64, ClassAttendanceModel> = ClassAttendance::find()
            .filter(ClassAttendanceColumn::CalendarEventId.is_in(event_ids))
            .filter(ClassAttendanceColumn::Status.eq(AttendanceStatus::Approved.to_string()))
            .all(conn)
            .await?
            .into_iter()
            .map(|r| (r.calendar_event_id, r))
            .collect();

        Ok(events
            .iter()
            .filter_map(|e| approved_month(e, rows.get(&e.id), offset))
            .collect())
    }

    /// 课时考勤（含课次考勤）改记到另一位教师名下
    async fn reassign_attendance<C: ConnectionTrait>(
        &self,
        conn: &C,
        row: ClassAttendanceModel,
        teacher_id: i64,
        now: i64,
    ) -> Result<ClassAttendanceModel> {
        let mut model: ClassAttendanceActiveModel = row.into();
        model.teacher_id = Set(teacher_id);
        model.updated_at = Set(now);
        let row = model.update(conn).await?;

        if let Some(lecture) = Lectures::find()
            .filter(LectureColumn::CalendarEventId.eq(row.calendar_event_id))
            .one(conn)
            .await?
        {
            let lecture_rows = LectureAttendance::find()
                .filter(LectureAttendanceColumn::LectureId.eq(lecture.id))
                .all(conn)
                .await?;
            for lecture_row in lecture_rows {
                let mut model: LectureAttendanceActiveModel = lecture_row.into();
                model.teacher_id = Set(teacher_id);
                model.updated_at = Set(now);
                model.update(conn).await?;
            }
        }

        Ok(row)
    }

    /// 事件 ID -> 课时考勤状态
    pub async fn get_attendance_statuses_impl(
        &self,
        event_ids: &[i64],
    ) -> Result<HashMap<i64, AttendanceStatus>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = ClassAttendance::find()
            .filter(ClassAttendanceColumn::CalendarEventId.is_in(event_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤状态失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                r.status
                    .parse::<AttendanceStatus>()
                    .ok()
                    .map(|status| (r.calendar_event_id, status))
            })
            .collect())
    }

    /// 课程类事件对应一条课次；事件不再是课程类时解除关联
    async fn sync_lecture<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: &Model,
        now: i64,
    ) -> Result<()> {
        let lecture = Lectures::find()
            .filter(LectureColumn::CalendarEventId.eq(event.id))
            .one(conn)
            .await?;

        let is_class = event.event_type == EventType::Class.as_str();
        match (is_class, event.course_id, lecture) {
            (true, Some(course_id), Some(lecture)) => {
                let mut model: LectureActiveModel = lecture.into();
                model.course_id = Set(course_id);
                model.teacher_id = Set(event.teacher_id);
                model.title = Set(event.title.clone());
                model.starts_at = Set(event.start_time);
                model.ends_at = Set(event.effective_end());
                model.update(conn).await?;
            }
            (true, Some(course_id), None) => {
                LectureActiveModel {
                    course_id: Set(course_id),
                    teacher_id: Set(event.teacher_id),
                    calendar_event_id: Set(Some(event.id)),
                    title: Set(event.title.clone()),
                    starts_at: Set(event.start_time),
                    ends_at: Set(event.effective_end()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
            }
            (_, _, Some(lecture)) => {
                let mut model: LectureActiveModel = lecture.into();
                model.calendar_event_id = Set(None);
                model.update(conn).await?;
            }
            _ => {}
        }

        Ok(())
    }
}

/// 已审核通过的课时计入 (考勤教师, 事件开始时间所在月)
fn approved_month(
    event: &Model,
    attendance: Option<&ClassAttendanceModel>,
    offset: &FixedOffset,
) -> Option<SalaryMonth> {
    let row = attendance.filter(|r| r.status == AttendanceStatus::Approved.as_str())?;
    let (year, month) = year_month_of(event.start_time, offset);
    Some((row.teacher_id, year, month))
}

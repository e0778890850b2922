//! 教师工资存储操作

use super::SeaOrmStorage;
use crate::entity::salary_payments::{ActiveModel, Column, Entity as SalaryPayments, Model};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    salaries::{
        entities::{SalaryPayment, SalaryStatus, SalaryTotals},
        requests::SalaryListQuery,
        responses::{SalaryListItem, SalaryListResponse},
    },
};
use crate::utils::datetime::month_bounds;

/// 工资汇总键：(教师, 年, 月)
pub(crate) type SalaryMonth = (i64, i32, u32);
use chrono::FixedOffset;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

fn filtered(query: &SalaryListQuery) -> Select<SalaryPayments> {
    let mut select = SalaryPayments::find();
    if let Some(teacher_id) = query.teacher_id {
        select = select.filter(Column::TeacherId.eq(teacher_id));
    }
    if let Some(year) = query.year {
        select = select.filter(Column::Year.eq(year));
    }
    if let Some(month) = query.month {
        select = select.filter(Column::Month.eq(month as i32));
    }
    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.to_string()));
    }
    select
        .order_by_desc(Column::Year)
        .order_by_desc(Column::Month)
        .order_by_asc(Column::TeacherId)
}

impl SeaOrmStorage {
    pub async fn list_salaries_with_pagination_impl(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let paginator = filtered(&query).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询工资总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询工资列表失败: {e}")))?;

        Ok(SalaryListResponse {
            items: self.with_teacher_names(rows).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 导出用，不分页
    pub async fn list_salaries_for_export_impl(
        &self,
        query: SalaryListQuery,
    ) -> Result<Vec<SalaryListItem>> {
        let rows = filtered(&query)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询工资列表失败: {e}")))?;

        self.with_teacher_names(rows).await
    }

    pub async fn get_salary_by_id_impl(&self, id: i64) -> Result<Option<SalaryPayment>> {
        let result = SalaryPayments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询工资记录失败: {e}")))?;

        Ok(result.map(|m| m.into_salary()))
    }

    /// 按已审核考勤重新汇总某月工资
    pub async fn recalculate_salary_impl(
        &self,
        teacher_id: i64,
        year: i32,
        month: u32,
        offset: FixedOffset,
    ) -> Result<SalaryPayment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let salary = self
            .refresh_salary(&txn, teacher_id, year, month, &offset, now)
            .await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("汇总工资失败: {e}")))?;

        Ok(salary.into_salary())
    }

    /// 标记已发放（pending -> paid）
    pub async fn mark_salary_paid_impl(
        &self,
        id: i64,
        paid_by: i64,
        note: Option<String>,
    ) -> Result<SalaryPayment> {
        let row = SalaryPayments::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("工资记录不存在: {id}")))?;
        if row.status == SalaryStatus::Paid.as_str() {
            return Err(LmsError::invalid_state("该工资已发放"));
        }

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = row.into();
        model.status = Set(SalaryStatus::Paid.to_string());
        model.paid_at = Set(Some(now));
        model.paid_by = Set(Some(paid_by));
        if let Some(note) = note {
            model.note = Set(Some(note));
        }
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("标记工资发放失败: {e}")))?;

        Ok(updated.into_salary())
    }

    pub(crate) async fn is_salary_paid<C: ConnectionTrait>(
        &self,
        conn: &C,
        teacher_id: i64,
        year: i32,
        month: u32,
    ) -> Result<bool> {
        let row = find_salary(conn, teacher_id, year, month).await?;
        Ok(row.is_some_and(|r| r.status == SalaryStatus::Paid.as_str()))
    }

    /// 已发放的月份不允许再改动其中已审核的课时
    pub(crate) async fn ensure_salary_open<C: ConnectionTrait>(
        &self,
        conn: &C,
        (teacher_id, year, month): SalaryMonth,
    ) -> Result<()> {
        if self.is_salary_paid(conn, teacher_id, year, month).await? {
            return Err(LmsError::conflict(format!(
                "{year}-{month:02} 工资已发放，不能修改该月已审核的课时"
            )));
        }
        Ok(())
    }

    /// 汇总并写入工资记录；已发放的月份拒绝修改
    pub(crate) async fn refresh_salary<C: ConnectionTrait>(
        &self,
        conn: &C,
        teacher_id: i64,
        year: i32,
        month: u32,
        offset: &FixedOffset,
        now: i64,
    ) -> Result<Model> {
        let range = month_bounds(year, month, offset)
            .ok_or_else(|| LmsError::validation(format!("无效的年月: {year}-{month}")))?;

        let existing = find_salary(conn, teacher_id, year, month).await?;
        if existing
            .as_ref()
            .is_some_and(|r| r.status == SalaryStatus::Paid.as_str())
        {
            return Err(LmsError::conflict(format!(
                "{year}-{month:02} 工资已发放，不能重新汇总"
            )));
        }

        let rows = self
            .approved_attendance_amounts(conn, teacher_id, range)
            .await?;
        let totals = SalaryTotals::from_rows(rows);

        let (mut model, is_new): (ActiveModel, bool) = match existing {
            Some(row) => (row.into(), false),
            None => (
                ActiveModel {
                    teacher_id: Set(teacher_id),
                    year: Set(year),
                    month: Set(month as i32),
                    status: Set(SalaryStatus::Pending.to_string()),
                    created_at: Set(now),
                    ..Default::default()
                },
                true,
            ),
        };

        model.total_classes = Set(totals.total_classes);
        model.base_amount = Set(totals.base_amount);
        model.bonus_amount = Set(totals.bonus_amount);
        model.total_amount = Set(totals.total_amount());
        model.updated_at = Set(now);

        let saved = if is_new {
            model.insert(conn).await?
        } else {
            model.update(conn).await?
        };
        Ok(saved)
    }

    async fn with_teacher_names(&self, rows: Vec<Model>) -> Result<Vec<SalaryListItem>> {
        let teacher_ids: Vec<i64> = rows.iter().map(|r| r.teacher_id).collect();
        let names = self.user_names(&self.db, &teacher_ids).await?;

        Ok(rows
            .into_iter()
            .map(|m| SalaryListItem {
                teacher_name: names.get(&m.teacher_id).cloned(),
                salary: m.into_salary(),
            })
            .collect())
    }
}

async fn find_salary<C: ConnectionTrait>(
    conn: &C,
    teacher_id: i64,
    year: i32,
    month: u32,
) -> Result<Option<Model>> {
    let row = SalaryPayments::find()
        .filter(Column::TeacherId.eq(teacher_id))
        .filter(Column::Year.eq(year))
        .filter(Column::Month.eq(month as i32))
        .one(conn)
        .await
        .map_err(|e| LmsError::database_operation(format!("查询工资记录失败: {e}")))?;
    Ok(row)
}

//! 缴费存储操作

use super::SeaOrmStorage;
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    enrollments::EnrollmentStatus,
    payments::{
        entities::{Payment, PaymentStatus},
        requests::{NewPayment, PaymentListQuery},
        responses::{PaymentListItem, PaymentListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建缴费记录
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(payment.student_id),
            course_id: Set(payment.course_id),
            enrollment_id: Set(payment.enrollment_id),
            amount: Set(payment.amount),
            method: Set(payment.method),
            reference: Set(payment.reference),
            status: Set(PaymentStatus::Pending.to_string()),
            note: Set(payment.note),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建缴费记录失败: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn get_payment_by_id_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询缴费记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 分页列出缴费记录，附带学生、课程、审核人名称
    pub async fn list_payments_with_pagination_impl(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Payments::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询缴费总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询缴费列表失败: {e}")))?;

        let user_ids: Vec<i64> = rows
            .iter()
            .flat_map(|r| std::iter::once(r.student_id).chain(r.reviewed_by))
            .collect();
        let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
        let names = self.user_names(&self.db, &user_ids).await?;
        let titles = self.course_titles(&self.db, &course_ids).await?;

        let items = rows
            .into_iter()
            .map(|m| PaymentListItem {
                student_name: names.get(&m.student_id).cloned(),
                course_title: titles.get(&m.course_id).cloned(),
                reviewer_name: m.reviewed_by.and_then(|id| names.get(&id).cloned()),
                payment: m.into_payment(),
            })
            .collect();

        Ok(PaymentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 审核通过
    ///
    /// 同一事务内将关联选课置为 active，不存在时新建。
    pub async fn approve_payment_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Payment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let payment = Payments::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("缴费记录不存在: {id}")))?;
        if payment.status != PaymentStatus::Pending.as_str() {
            return Err(LmsError::invalid_state("只能审核待处理的缴费记录"));
        }

        let now = chrono::Utc::now().timestamp();

        let existing = match payment.enrollment_id {
            Some(enrollment_id) => Enrollments::find_by_id(enrollment_id).one(&txn).await?,
            None => None,
        };
        let existing = match existing {
            Some(enrollment) => Some(enrollment),
            None => {
                Enrollments::find()
                    .filter(EnrollmentColumn::StudentId.eq(payment.student_id))
                    .filter(EnrollmentColumn::CourseId.eq(payment.course_id))
                    .one(&txn)
                    .await?
            }
        };

        let enrollment_id = match existing {
            Some(enrollment) => {
                let enrollment_id = enrollment.id;
                if enrollment.status != EnrollmentStatus::Active.as_str() {
                    let mut active: EnrollmentActiveModel = enrollment.into();
                    active.status = Set(EnrollmentStatus::Active.to_string());
                    active.updated_at = Set(now);
                    active.update(&txn).await?;
                }
                enrollment_id
            }
            None => {
                let created = EnrollmentActiveModel {
                    student_id: Set(payment.student_id),
                    course_id: Set(payment.course_id),
                    status: Set(EnrollmentStatus::Active.to_string()),
                    enrolled_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                created.id
            }
        };

        let mut model: ActiveModel = payment.into();
        model.status = Set(PaymentStatus::Approved.to_string());
        model.enrollment_id = Set(Some(enrollment_id));
        model.reviewed_by = Set(Some(reviewer_id));
        model.reviewed_at = Set(Some(now));
        if let Some(note) = note {
            model.note = Set(Some(note));
        }
        let updated = model.update(&txn).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("审核缴费失败: {e}")))?;

        Ok(updated.into_payment())
    }

    /// 驳回
    pub async fn reject_payment_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        reason: String,
    ) -> Result<Payment> {
        let payment = Payments::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("缴费记录不存在: {id}")))?;
        if payment.status != PaymentStatus::Pending.as_str() {
            return Err(LmsError::invalid_state("只能审核待处理的缴费记录"));
        }

        let mut model: ActiveModel = payment.into();
        model.status = Set(PaymentStatus::Rejected.to_string());
        model.reviewed_by = Set(Some(reviewer_id));
        model.reviewed_at = Set(Some(chrono::Utc::now().timestamp()));
        model.note = Set(Some(reason));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("驳回缴费失败: {e}")))?;

        Ok(updated.into_payment())
    }
}

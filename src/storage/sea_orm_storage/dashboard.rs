//! 管理后台统计

use super::SeaOrmStorage;
use crate::entity::{contact_inquiries, courses, enrollments, payments, salary_payments, users};
use crate::errors::{LmsError, Result};
use crate::models::{
    attendance::entities::AttendanceStatus,
    dashboard::DashboardStats,
    enrollments::entities::EnrollmentStatus,
    inquiries::entities::InquiryStatus,
    payments::entities::PaymentStatus,
    salaries::entities::SalaryStatus,
    users::entities::UserRole,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    pub async fn get_dashboard_stats_impl(&self) -> Result<DashboardStats> {
        let map_err = |e: sea_orm::DbErr| LmsError::database_operation(format!("统计失败: {e}"));

        let student_count = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Student.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let teacher_count = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Teacher.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let course_count = courses::Entity::find()
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let published_course_count = courses::Entity::find()
            .filter(courses::Column::IsPublished.eq(true))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let active_enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let pending_payments = payments::Entity::find()
            .filter(payments::Column::Status.eq(PaymentStatus::Pending.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let pending_attendance = self
            .count_attendance_with_status(&self.db, AttendanceStatus::Completed)
            .await?;
        let unpaid_salaries = salary_payments::Entity::find()
            .filter(salary_payments::Column::Status.eq(SalaryStatus::Pending.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let new_inquiries = contact_inquiries::Entity::find()
            .filter(contact_inquiries::Column::Status.eq(InquiryStatus::New.to_string()))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        Ok(DashboardStats {
            student_count: student_count as i64,
            teacher_count: teacher_count as i64,
            course_count: course_count as i64,
            published_course_count: published_course_count as i64,
            active_enrollments: active_enrollments as i64,
            pending_payments: pending_payments as i64,
            pending_attendance,
            unpaid_salaries: unpaid_salaries as i64,
            new_inquiries: new_inquiries as i64,
            generated_at: chrono::Utc::now(),
        })
    }
}

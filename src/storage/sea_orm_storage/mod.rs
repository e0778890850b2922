//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod attendance;
mod calendar;
mod courses;
mod dashboard;
mod enrollments;
mod inquiries;
pub(crate) mod lookups;
mod payments;
mod salaries;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 基于已有连接创建实例并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 内存 SQLite，仅用于测试
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;
        Self::from_connection(db).await
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use std::collections::HashMap;

use chrono::FixedOffset;

use crate::models::{
    assignments::{
        entities::{Assignment, Submission},
        requests::{AssignmentDraft, AssignmentListQuery},
        responses::{AssignmentListResponse, StudentSubmissionRow},
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::{AttendanceListQuery, AttendanceReview},
        responses::{AttendanceListResponse, AttendanceSyncResponse},
    },
    calendar::{
        entities::CalendarEvent,
        requests::{CalendarQuery, EventDraft},
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    dashboard::DashboardStats,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
    inquiries::{
        entities::{ContactInquiry, InquiryStatus},
        requests::CreateInquiryRequest,
        responses::InquiryListResponse,
    },
    payments::{
        entities::Payment,
        requests::{NewPayment, PaymentListQuery},
        responses::PaymentListResponse,
    },
    salaries::{
        entities::SalaryPayment,
        requests::SalaryListQuery,
        responses::{SalaryListItem, SalaryListResponse},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_seen(&self, id: i64) -> Result<bool> {
        self.update_last_seen_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn get_user_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        self.user_names(&self.db, ids).await
    }

    // 课程模块
    async fn get_course_titles(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        self.course_titles(&self.db, ids).await
    }

    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64, offset: FixedOffset) -> Result<bool> {
        self.delete_course_impl(id, offset).await
    }

    async fn count_active_enrollments(&self, course_id: i64) -> Result<i64> {
        self.count_active_enrollments_impl(course_id).await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, course_id, status)
            .await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn get_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(student_id, course_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_status_impl(id, status).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn list_active_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_active_course_ids_impl(student_id).await
    }

    async fn list_active_student_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        self.list_active_student_ids_impl(course_id).await
    }

    // 缴费模块
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_by_id_impl(id).await
    }

    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        self.list_payments_with_pagination_impl(query).await
    }

    async fn approve_payment(
        &self,
        id: i64,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Payment> {
        self.approve_payment_impl(id, reviewer_id, note).await
    }

    async fn reject_payment(&self, id: i64, reviewer_id: i64, reason: String) -> Result<Payment> {
        self.reject_payment_impl(id, reviewer_id, reason).await
    }

    // 日历模块
    async fn create_event(&self, draft: EventDraft, created_by: i64) -> Result<CalendarEvent> {
        self.create_event_impl(draft, created_by).await
    }

    async fn get_event_by_id(&self, id: i64) -> Result<Option<CalendarEvent>> {
        self.get_event_by_id_impl(id).await
    }

    async fn list_events(&self, query: CalendarQuery) -> Result<Vec<CalendarEvent>> {
        self.list_events_impl(query).await
    }

    async fn update_event(
        &self,
        id: i64,
        draft: EventDraft,
        offset: FixedOffset,
    ) -> Result<Option<CalendarEvent>> {
        self.update_event_impl(id, draft, offset).await
    }

    async fn delete_event(&self, id: i64, offset: FixedOffset) -> Result<bool> {
        self.delete_event_impl(id, offset).await
    }

    async fn get_attendance_statuses(
        &self,
        event_ids: &[i64],
    ) -> Result<HashMap<i64, AttendanceStatus>> {
        self.get_attendance_statuses_impl(event_ids).await
    }

    // 考勤模块
    async fn mark_class_completed(
        &self,
        event_id: i64,
        teacher_id: i64,
        amount: f64,
        completed_at: i64,
    ) -> Result<AttendanceSyncResponse> {
        self.mark_class_completed_impl(event_id, teacher_id, amount, completed_at)
            .await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_attendance_with_pagination_impl(query).await
    }

    async fn review_attendance(
        &self,
        id: i64,
        reviewer_id: i64,
        review: AttendanceReview,
        offset: FixedOffset,
    ) -> Result<AttendanceSyncResponse> {
        self.review_attendance_impl(id, reviewer_id, review, offset)
            .await
    }

    // 工资模块
    async fn list_salaries_with_pagination(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse> {
        self.list_salaries_with_pagination_impl(query).await
    }

    async fn list_salaries_for_export(
        &self,
        query: SalaryListQuery,
    ) -> Result<Vec<SalaryListItem>> {
        self.list_salaries_for_export_impl(query).await
    }

    async fn get_salary_by_id(&self, id: i64) -> Result<Option<SalaryPayment>> {
        self.get_salary_by_id_impl(id).await
    }

    async fn recalculate_salary(
        &self,
        teacher_id: i64,
        year: i32,
        month: u32,
        offset: FixedOffset,
    ) -> Result<SalaryPayment> {
        self.recalculate_salary_impl(teacher_id, year, month, offset)
            .await
    }

    async fn mark_salary_paid(
        &self,
        id: i64,
        paid_by: i64,
        note: Option<String>,
    ) -> Result<SalaryPayment> {
        self.mark_salary_paid_impl(id, paid_by, note).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        draft: AssignmentDraft,
        student_ids: Vec<i64>,
    ) -> Result<Assignment> {
        self.create_assignment_impl(draft, student_ids).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        draft: AssignmentDraft,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, draft, student_ids).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn list_assignment_student_ids(&self, assignment_id: i64) -> Result<Vec<i64>> {
        self.list_assignment_student_ids_impl(assignment_id).await
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionRow>> {
        self.list_assignment_submissions_impl(assignment_id).await
    }

    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, student_id).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        file_url: Option<String>,
        is_late: bool,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, student_id, content, file_url, is_late)
            .await
    }

    async fn grade_submission(
        &self,
        id: i64,
        grader_id: i64,
        grade: f64,
        feedback: Option<String>,
        feedback_file_url: Option<String>,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, grader_id, grade, feedback, feedback_file_url)
            .await
    }

    // 咨询模块
    async fn create_inquiry(&self, inquiry: CreateInquiryRequest) -> Result<ContactInquiry> {
        self.create_inquiry_impl(inquiry).await
    }

    async fn list_inquiries_with_pagination(
        &self,
        page: Option<i64>,
        size: Option<i64>,
        status: Option<InquiryStatus>,
    ) -> Result<InquiryListResponse> {
        self.list_inquiries_with_pagination_impl(page, size, status)
            .await
    }

    async fn mark_inquiry_handled(&self, id: i64) -> Result<Option<ContactInquiry>> {
        self.mark_inquiry_handled_impl(id).await
    }

    // 统计
    async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_dashboard_stats_impl().await
    }
}

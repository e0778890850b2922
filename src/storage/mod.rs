use std::collections::HashMap;
use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户及其名下数据（事务）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新最后活跃时间
    async fn update_last_seen(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 批量获取展示名
    async fn get_user_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    // 删除课程及其选课、缴费、作业、课次、日历事件（事务），并刷新受影响月份的工资
    async fn delete_course(&self, id: i64, offset: FixedOffset) -> Result<bool>;
    // 课程在读（active）人数
    async fn count_active_enrollments(&self, course_id: i64) -> Result<i64>;
    // 批量获取课程名
    async fn get_course_titles(&self, ids: &[i64]) -> Result<HashMap<i64, String>>;

    /// 选课管理方法
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment(&self, student_id: i64, course_id: i64)
    -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    // 学生在读课程
    async fn list_active_course_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    // 课程在读学生
    async fn list_active_student_ids(&self, course_id: i64) -> Result<Vec<i64>>;

    /// 缴费管理方法
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse>;
    // 审核通过并激活选课（事务）
    async fn approve_payment(
        &self,
        id: i64,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Payment>;
    async fn reject_payment(&self, id: i64, reviewer_id: i64, reason: String) -> Result<Payment>;

    /// 日历管理方法
    // 创建事件，课程类事件同时创建课次（事务）
    async fn create_event(&self, draft: EventDraft, created_by: i64) -> Result<CalendarEvent>;
    async fn get_event_by_id(&self, id: i64) -> Result<Option<CalendarEvent>>;
    async fn list_events(&self, query: CalendarQuery) -> Result<Vec<CalendarEvent>>;
    // 整体更新事件；已审核课时改月或改派教师时刷新新旧两个月的工资（事务）
    async fn update_event(
        &self,
        id: i64,
        draft: EventDraft,
        offset: FixedOffset,
    ) -> Result<Option<CalendarEvent>>;
    // 删除事件及其考勤、课次（事务），并刷新受影响月份的工资
    async fn delete_event(&self, id: i64, offset: FixedOffset) -> Result<bool>;
    // 批量获取事件的考勤状态
    async fn get_attendance_statuses(
        &self,
        event_ids: &[i64],
    ) -> Result<HashMap<i64, AttendanceStatus>>;

    /// 考勤管理方法
    // 教师标记课时完成，同步写入两张考勤表（事务）
    async fn mark_class_completed(
        &self,
        event_id: i64,
        teacher_id: i64,
        amount: f64,
        completed_at: i64,
    ) -> Result<AttendanceSyncResponse>;
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>>;
    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    // 审核考勤，通过时刷新当月工资（事务）
    async fn review_attendance(
        &self,
        id: i64,
        reviewer_id: i64,
        review: AttendanceReview,
        offset: FixedOffset,
    ) -> Result<AttendanceSyncResponse>;

    /// 工资管理方法
    async fn list_salaries_with_pagination(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse>;
    async fn list_salaries_for_export(&self, query: SalaryListQuery)
    -> Result<Vec<SalaryListItem>>;
    async fn get_salary_by_id(&self, id: i64) -> Result<Option<SalaryPayment>>;
    async fn recalculate_salary(
        &self,
        teacher_id: i64,
        year: i32,
        month: u32,
        offset: FixedOffset,
    ) -> Result<SalaryPayment>;
    async fn mark_salary_paid(
        &self,
        id: i64,
        paid_by: i64,
        note: Option<String>,
    ) -> Result<SalaryPayment>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        draft: AssignmentDraft,
        student_ids: Vec<i64>,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        id: i64,
        draft: AssignmentDraft,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    async fn list_assignment_student_ids(&self, assignment_id: i64) -> Result<Vec<i64>>;
    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StudentSubmissionRow>>;
    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 提交或替换（未批改时）
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        file_url: Option<String>,
        is_late: bool,
    ) -> Result<Submission>;
    async fn grade_submission(
        &self,
        id: i64,
        grader_id: i64,
        grade: f64,
        feedback: Option<String>,
        feedback_file_url: Option<String>,
    ) -> Result<Option<Submission>>;

    /// 咨询管理方法
    async fn create_inquiry(&self, inquiry: CreateInquiryRequest) -> Result<ContactInquiry>;
    async fn list_inquiries_with_pagination(
        &self,
        page: Option<i64>,
        size: Option<i64>,
        status: Option<InquiryStatus>,
    ) -> Result<InquiryListResponse>;
    async fn mark_inquiry_handled(&self, id: i64) -> Result<Option<ContactInquiry>>;

    /// 统计
    async fn get_dashboard_stats(&self) -> Result<DashboardStats>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

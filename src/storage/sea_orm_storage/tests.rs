use super::SeaOrmStorage;
use crate::entity::{
    assignment_students, assignments, calendar_events, class_attendance, enrollments,
    lecture_attendance, lectures, payments, submissions,
};
use crate::models::{
    attendance::{
        entities::AttendanceStatus,
        requests::{AttendanceListQuery, AttendanceReview},
    },
    calendar::{entities::EventType, requests::EventDraft},
    courses::requests::CreateCourseRequest,
    enrollments::entities::EnrollmentStatus,
    payments::{entities::PaymentStatus, requests::NewPayment},
    salaries::{
        entities::{SalaryPayment, SalaryStatus},
        requests::SalaryListQuery,
    },
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, UserListQuery},
    },
};
use chrono::{FixedOffset, TimeZone, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory().await.unwrap()
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role,
            full_name: None,
            phone: None,
            avatar_url: None,
            class_rate: None,
        })
        .await
        .unwrap()
        .id
}

async fn course(storage: &SeaOrmStorage, teacher_id: Option<i64>) -> i64 {
    storage
        .create_course_impl(CreateCourseRequest {
            title: "Spanish A1".to_string(),
            description: None,
            level: Some("A1".to_string()),
            price: Some(120.0),
            duration_weeks: Some(8),
            teacher_id,
            is_published: Some(true),
        })
        .await
        .unwrap()
        .id
}

fn class_draft(course_id: i64, teacher_id: i64, month: u32, day: u32) -> EventDraft {
    let start = Utc
        .with_ymd_and_hms(2025, month, day, 10, 0, 0)
        .unwrap()
        .timestamp();
    EventDraft {
        title: format!("Lesson {month}-{day}"),
        description: None,
        event_type: EventType::Class,
        start_time: start,
        end_time: Some(start + 3600),
        all_day: false,
        course_id: Some(course_id),
        teacher_id: Some(teacher_id),
        payment_amount: None,
        color: EventType::Class.default_color().to_string(),
    }
}

async fn class_event(storage: &SeaOrmStorage, course_id: i64, teacher_id: i64, day: u32) -> i64 {
    storage
        .create_event_impl(class_draft(course_id, teacher_id, 1, day), teacher_id)
        .await
        .unwrap()
        .id
}

/// 标记完成并审核通过，返回考勤 ID
async fn approved_class(
    storage: &SeaOrmStorage,
    event_id: i64,
    teacher: i64,
    admin: i64,
) -> i64 {
    let marked = storage
        .mark_class_completed_impl(event_id, teacher, 30.0, Utc::now().timestamp())
        .await
        .unwrap();
    storage
        .review_attendance_impl(
            marked.class_attendance.id,
            admin,
            AttendanceReview::Approve { bonus: 0.0 },
            utc(),
        )
        .await
        .unwrap();
    marked.class_attendance.id
}

async fn salary_of(storage: &SeaOrmStorage, teacher: i64, month: u32) -> Option<SalaryPayment> {
    storage
        .list_salaries_with_pagination_impl(SalaryListQuery {
            teacher_id: Some(teacher),
            year: Some(2025),
            month: Some(month),
            ..Default::default()
        })
        .await
        .unwrap()
        .items
        .into_iter()
        .next()
        .map(|item| item.salary)
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

#[tokio::test]
async fn test_approve_removes_row_from_pending_list() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;
    let event_id = class_event(&storage, course_id, teacher, 10).await;

    let marked = storage
        .mark_class_completed_impl(event_id, teacher, 30.0, Utc::now().timestamp())
        .await
        .unwrap();
    assert_eq!(marked.class_attendance.status, AttendanceStatus::Completed);
    // 课程类事件同步写入课次考勤
    let lecture = marked.lecture_attendance.unwrap();
    assert_eq!(lecture.status, AttendanceStatus::Completed);

    let pending = AttendanceListQuery {
        status: Some(AttendanceStatus::Completed),
        ..Default::default()
    };
    let before = storage
        .list_attendance_with_pagination_impl(pending.clone())
        .await
        .unwrap();
    assert_eq!(before.items.len(), 1);

    let reviewed = storage
        .review_attendance_impl(
            marked.class_attendance.id,
            admin,
            AttendanceReview::Approve { bonus: 0.0 },
            utc(),
        )
        .await
        .unwrap();
    assert_eq!(reviewed.class_attendance.status, AttendanceStatus::Approved);
    assert_eq!(
        reviewed.lecture_attendance.map(|r| r.status),
        Some(AttendanceStatus::Approved)
    );

    let after = storage
        .list_attendance_with_pagination_impl(pending)
        .await
        .unwrap();
    assert!(after.items.is_empty());

    // 已审核的考勤不能再次标记完成
    let err = storage
        .mark_class_completed_impl(event_id, teacher, 30.0, Utc::now().timestamp())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");
}

#[tokio::test]
async fn test_deleted_user_disappears_from_list() {
    let storage = storage().await;
    let student = user(&storage, "student", UserRole::Student).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;
    storage
        .create_enrollment_impl(student, course_id, EnrollmentStatus::Active)
        .await
        .unwrap();

    assert!(storage.delete_user_impl(student).await.unwrap());
    assert!(storage.delete_user_impl(teacher).await.unwrap());

    let list = storage
        .list_users_with_pagination_impl(UserListQuery::default())
        .await
        .unwrap();
    assert!(list.items.is_empty());
    assert_eq!(list.pagination.total, 0);

    // 课程保留，授课教师被清空
    let course = storage.get_course_by_id_impl(course_id).await.unwrap().unwrap();
    assert_eq!(course.teacher_id, None);
    assert!(!storage.delete_user_impl(student).await.unwrap());
}

#[tokio::test]
async fn test_salary_sums_approved_rows_only() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;

    let mut attendance_ids = Vec::new();
    for day in [6, 13, 20] {
        let event_id = class_event(&storage, course_id, teacher, day).await;
        let marked = storage
            .mark_class_completed_impl(event_id, teacher, 30.0, Utc::now().timestamp())
            .await
            .unwrap();
        attendance_ids.push(marked.class_attendance.id);
    }

    storage
        .review_attendance_impl(
            attendance_ids[0],
            admin,
            AttendanceReview::Approve { bonus: 5.0 },
            utc(),
        )
        .await
        .unwrap();
    storage
        .review_attendance_impl(
            attendance_ids[1],
            admin,
            AttendanceReview::Reject {
                reason: "no-show".to_string(),
            },
            utc(),
        )
        .await
        .unwrap();

    let salary = storage
        .recalculate_salary_impl(teacher, 2025, 1, utc())
        .await
        .unwrap();
    assert_eq!(salary.total_classes, 1);
    assert_eq!(salary.base_amount, 30.0);
    assert_eq!(salary.bonus_amount, 5.0);
    assert_eq!(salary.total_amount, 35.0);
    assert_eq!(salary.status, SalaryStatus::Pending);

    let list = storage
        .list_salaries_with_pagination_impl(SalaryListQuery {
            teacher_id: Some(teacher),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].teacher_name.as_deref(), Some("teacher"));

    let paid = storage
        .mark_salary_paid_impl(salary.id, admin, None)
        .await
        .unwrap();
    assert_eq!(paid.status, SalaryStatus::Paid);

    // 已发放月份不再接受审核通过，也不能重复发放
    let err = storage
        .review_attendance_impl(
            attendance_ids[2],
            admin,
            AttendanceReview::Approve { bonus: 0.0 },
            utc(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E013");
    let err = storage
        .mark_salary_paid_impl(salary.id, admin, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");
}

#[tokio::test]
async fn test_payment_approval_activates_enrollment() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let course_id = course(&storage, None).await;

    let enrollment = storage
        .create_enrollment_impl(student, course_id, EnrollmentStatus::Pending)
        .await
        .unwrap();

    let payment = storage
        .create_payment_impl(NewPayment {
            student_id: student,
            course_id,
            enrollment_id: None,
            amount: 120.0,
            method: Some("bank_transfer".to_string()),
            reference: "PAY-TEST-0001".to_string(),
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    let approved = storage
        .approve_payment_impl(payment.id, admin, Some("ok".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.status, PaymentStatus::Approved);
    assert_eq!(approved.enrollment_id, Some(enrollment.id));
    assert_eq!(approved.reviewed_by, Some(admin));

    let enrollment = storage
        .get_enrollment_by_id_impl(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert_eq!(
        storage.count_active_enrollments_impl(course_id).await.unwrap(),
        1
    );

    // 只能审核待处理的缴费
    let err = storage
        .approve_payment_impl(payment.id, admin, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");
}

#[tokio::test]
async fn test_assignment_submission_cannot_change_after_grading() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let course_id = course(&storage, Some(teacher)).await;

    let assignment = storage
        .create_assignment_impl(
            crate::models::assignments::requests::AssignmentDraft {
                course_id,
                teacher_id: Some(teacher),
                title: "Essay".to_string(),
                description: None,
                due_date: None,
                max_grade: 20.0,
                attachment_url: None,
            },
            vec![student, student],
        )
        .await
        .unwrap();
    assert_eq!(
        storage
            .list_assignment_student_ids_impl(assignment.id)
            .await
            .unwrap(),
        vec![student]
    );

    let rows = storage
        .list_assignment_submissions_impl(assignment.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].submission.is_none());

    let first = storage
        .upsert_submission_impl(assignment.id, student, Some("v1".into()), None, false)
        .await
        .unwrap();
    let second = storage
        .upsert_submission_impl(assignment.id, student, Some("v2".into()), None, true)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.content.as_deref(), Some("v2"));
    assert!(second.is_late);

    let graded = storage
        .grade_submission_impl(second.id, teacher, 18.0, Some("good".into()), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.grade, Some(18.0));

    let err = storage
        .upsert_submission_impl(assignment.id, student, Some("v3".into()), None, false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");
}

#[tokio::test]
async fn test_delete_event_removes_attendance_and_refreshes_salary() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;
    let kept = class_event(&storage, course_id, teacher, 6).await;
    let removed = class_event(&storage, course_id, teacher, 13).await;
    approved_class(&storage, kept, teacher, admin).await;
    approved_class(&storage, removed, teacher, admin).await;

    let salary = salary_of(&storage, teacher, 1).await.unwrap();
    assert_eq!(salary.total_classes, 2);
    assert_eq!(salary.total_amount, 60.0);

    assert!(storage.delete_event_impl(removed, utc()).await.unwrap());

    let salary = salary_of(&storage, teacher, 1).await.unwrap();
    assert_eq!(salary.total_classes, 1);
    assert_eq!(salary.total_amount, 30.0);

    // 只剩保留事件的考勤与课次
    let db = &storage.db;
    assert_eq!(class_attendance::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(lecture_attendance::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(lectures::Entity::find().count(db).await.unwrap(), 1);
    assert!(storage.get_event_by_id_impl(removed).await.unwrap().is_none());
    assert!(!storage.delete_event_impl(removed, utc()).await.unwrap());
}

#[tokio::test]
async fn test_rescheduled_class_moves_between_salary_months() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let substitute = user(&storage, "substitute", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;
    let event_id = class_event(&storage, course_id, teacher, 20).await;
    let attendance_id = approved_class(&storage, event_id, teacher, admin).await;

    // 改到二月
    storage
        .update_event_impl(event_id, class_draft(course_id, teacher, 2, 3), utc())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(salary_of(&storage, teacher, 1).await.unwrap().total_classes, 0);
    assert_eq!(salary_of(&storage, teacher, 2).await.unwrap().total_classes, 1);

    // 改派教师，考勤与工资一起转移
    storage
        .update_event_impl(event_id, class_draft(course_id, substitute, 2, 3), utc())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(salary_of(&storage, teacher, 2).await.unwrap().total_classes, 0);
    let salary = salary_of(&storage, substitute, 2).await.unwrap();
    assert_eq!(salary.total_classes, 1);
    assert_eq!(salary.total_amount, 30.0);

    let record = storage
        .get_attendance_by_id_impl(attendance_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.teacher_id, substitute);
    assert_eq!(record.status, AttendanceStatus::Approved);
}

#[tokio::test]
async fn test_paid_month_blocks_changes_to_approved_class() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let course_id = course(&storage, Some(teacher)).await;
    let event_id = class_event(&storage, course_id, teacher, 10).await;
    approved_class(&storage, event_id, teacher, admin).await;

    let salary = salary_of(&storage, teacher, 1).await.unwrap();
    storage
        .mark_salary_paid_impl(salary.id, admin, None)
        .await
        .unwrap();

    let err = storage.delete_event_impl(event_id, utc()).await.unwrap_err();
    assert_eq!(err.code(), "E013");
    let err = storage
        .update_event_impl(event_id, class_draft(course_id, teacher, 2, 3), utc())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E013");
    let err = storage.delete_course_impl(course_id, utc()).await.unwrap_err();
    assert_eq!(err.code(), "E013");

    // 事务回滚，事件与发放记录保持原样
    let event = storage.get_event_by_id_impl(event_id).await.unwrap().unwrap();
    assert_eq!(
        event.start_time.timestamp(),
        class_draft(course_id, teacher, 1, 10).start_time
    );
    let salary = salary_of(&storage, teacher, 1).await.unwrap();
    assert_eq!(salary.status, SalaryStatus::Paid);
    assert_eq!(salary.total_classes, 1);

    // 改标题不影响工资月份，仍可修改
    let mut draft = class_draft(course_id, teacher, 1, 10);
    draft.title = "Lesson (room 2)".to_string();
    let event = storage
        .update_event_impl(event_id, draft, utc())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.title, "Lesson (room 2)");
}

#[tokio::test]
async fn test_delete_course_cascades_everything() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let student = user(&storage, "student", UserRole::Student).await;
    let course_id = course(&storage, Some(teacher)).await;
    let other_course = course(&storage, Some(teacher)).await;

    storage
        .create_enrollment_impl(student, course_id, EnrollmentStatus::Active)
        .await
        .unwrap();
    storage
        .create_payment_impl(NewPayment {
            student_id: student,
            course_id,
            enrollment_id: None,
            amount: 120.0,
            method: Some("cash".to_string()),
            reference: "PAY-TEST-0002".to_string(),
            note: None,
        })
        .await
        .unwrap();
    let assignment = storage
        .create_assignment_impl(
            crate::models::assignments::requests::AssignmentDraft {
                course_id,
                teacher_id: Some(teacher),
                title: "Essay".to_string(),
                description: None,
                due_date: None,
                max_grade: 20.0,
                attachment_url: None,
            },
            vec![student],
        )
        .await
        .unwrap();
    storage
        .upsert_submission_impl(assignment.id, student, Some("v1".into()), None, false)
        .await
        .unwrap();

    let event_id = class_event(&storage, course_id, teacher, 10).await;
    approved_class(&storage, event_id, teacher, admin).await;
    let other_event = class_event(&storage, other_course, teacher, 17).await;
    approved_class(&storage, other_event, teacher, admin).await;
    assert_eq!(salary_of(&storage, teacher, 1).await.unwrap().total_classes, 2);

    assert!(storage.delete_course_impl(course_id, utc()).await.unwrap());

    let db = &storage.db;
    assert_eq!(enrollments::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(payments::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(assignments::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(assignment_students::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(submissions::Entity::find().count(db).await.unwrap(), 0);
    // 另一门课程的事件、课次与考勤保留
    assert_eq!(calendar_events::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(lectures::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(class_attendance::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(lecture_attendance::Entity::find().count(db).await.unwrap(), 1);
    assert!(storage.get_course_by_id_impl(course_id).await.unwrap().is_none());

    let salary = salary_of(&storage, teacher, 1).await.unwrap();
    assert_eq!(salary.total_classes, 1);
    assert_eq!(salary.total_amount, 30.0);
}

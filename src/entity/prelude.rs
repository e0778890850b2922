//! 预导入模块，方便使用

pub use super::assignment_students::{
    ActiveModel as AssignmentStudentActiveModel, Entity as AssignmentStudents,
    Model as AssignmentStudentModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::calendar_events::{
    ActiveModel as CalendarEventActiveModel, Entity as CalendarEvents,
    Model as CalendarEventModel,
};
pub use super::class_attendance::{
    ActiveModel as ClassAttendanceActiveModel, Entity as ClassAttendance,
    Model as ClassAttendanceModel,
};
pub use super::contact_inquiries::{
    ActiveModel as ContactInquiryActiveModel, Entity as ContactInquiries,
    Model as ContactInquiryModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::lecture_attendance::{
    ActiveModel as LectureAttendanceActiveModel, Entity as LectureAttendance,
    Model as LectureAttendanceModel,
};
pub use super::lectures::{
    ActiveModel as LectureActiveModel, Entity as Lectures, Model as LectureModel,
};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::salary_payments::{
    ActiveModel as SalaryPaymentActiveModel, Entity as SalaryPayments,
    Model as SalaryPaymentModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};

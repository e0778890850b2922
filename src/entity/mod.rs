//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignment_students;
pub mod assignments;
pub mod calendar_events;
pub mod class_attendance;
pub mod contact_inquiries;
pub mod courses;
pub mod enrollments;
pub mod lecture_attendance;
pub mod lectures;
pub mod payments;
pub mod salary_payments;
pub mod submissions;
pub mod users;

pub mod assignments;
pub mod attendance;
pub mod calendar;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod inquiries;
pub mod payments;
pub mod salaries;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 应用启动时间，用于统计启动耗时
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

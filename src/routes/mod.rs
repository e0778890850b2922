pub mod assignments;

pub mod attendance;

pub mod auth;

pub mod calendar;

pub mod courses;

pub mod dashboard;

pub mod enrollments;

pub mod inquiries;

pub mod payments;

pub mod salaries;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use calendar::configure_calendar_routes;
pub use courses::configure_course_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use inquiries::configure_inquiry_routes;
pub use payments::configure_payment_routes;
pub use salaries::configure_salary_routes;
pub use users::configure_user_routes;

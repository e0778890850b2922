pub mod responses;

pub use responses::DashboardStats;

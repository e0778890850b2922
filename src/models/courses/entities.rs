use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub price: f64,
    pub duration_weeks: Option<i32>,
    pub teacher_id: Option<i64>,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

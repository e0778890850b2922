use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 提交状态
    pub enum SubmissionStatus in "提交状态" => "../frontend/src/types/generated/assignment.ts" {
        Submitted = "submitted",
        Graded = "graded",
    }
}

pub const DEFAULT_MAX_GRADE: f64 = 100.0;

// 作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_grade: f64,
    pub attachment_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 在给定时间提交是否算迟交
    pub fn is_late_at(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| at > due)
    }

    /// 分数是否在 0..=max_grade 内
    pub fn accepts_grade(&self, grade: f64) -> bool {
        grade.is_finite() && (0.0..=self.max_grade).contains(&grade)
    }
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub feedback_file_url: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(due_in: Option<Duration>) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            course_id: 1,
            teacher_id: Some(2),
            title: "Essay".into(),
            description: None,
            due_date: due_in.map(|d| now + d),
            max_grade: 20.0,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_grade_bounds() {
        let a = assignment(None);
        assert!(a.accepts_grade(0.0));
        assert!(a.accepts_grade(20.0));
        assert!(a.accepts_grade(12.5));
        assert!(!a.accepts_grade(-0.5));
        assert!(!a.accepts_grade(20.5));
        assert!(!a.accepts_grade(f64::NAN));
    }

    #[test]
    fn test_late_flag() {
        let now = Utc::now();
        assert!(!assignment(None).is_late_at(now));
        assert!(!assignment(Some(Duration::hours(1))).is_late_at(now));
        assert!(assignment(Some(Duration::hours(-1))).is_late_at(now));
    }
}

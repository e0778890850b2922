use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 工资发放状态
    pub enum SalaryStatus in "工资状态" => "../frontend/src/types/generated/salary.ts" {
        Pending = "pending",
        Paid = "paid",
    }
}

// 教师月度工资
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/salary.ts")]
pub struct SalaryPayment {
    pub id: i64,
    pub teacher_id: i64,
    pub year: i32,
    pub month: u32,
    pub total_classes: i32,
    pub base_amount: f64,
    pub bonus_amount: f64,
    pub total_amount: f64,
    pub status: SalaryStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub paid_by: Option<i64>,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 按已审核通过的考勤汇总的工资金额
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalaryTotals {
    pub total_classes: i32,
    pub base_amount: f64,
    pub bonus_amount: f64,
}

impl SalaryTotals {
    /// 由 (课时费, 奖金) 列表汇总
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        rows.into_iter()
            .fold(SalaryTotals::default(), |mut acc, (amount, bonus)| {
                acc.total_classes += 1;
                acc.base_amount += amount;
                acc.bonus_amount += bonus;
                acc
            })
    }

    pub fn total_amount(&self) -> f64 {
        self.base_amount + self.bonus_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_from_rows() {
        let totals = SalaryTotals::from_rows([(25.0, 0.0), (30.0, 5.0), (25.0, 2.5)]);
        assert_eq!(totals.total_classes, 3);
        assert_eq!(totals.base_amount, 80.0);
        assert_eq!(totals.bonus_amount, 7.5);
        assert_eq!(totals.total_amount(), 87.5);
    }

    #[test]
    fn test_totals_empty() {
        let totals = SalaryTotals::from_rows(Vec::new());
        assert_eq!(totals, SalaryTotals::default());
        assert_eq!(totals.total_amount(), 0.0);
    }
}

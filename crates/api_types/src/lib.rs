use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Amount in currency minor units, must be > 0.
        pub amount_minor: i64,
        pub description: String,
        /// ISO calendar date, `YYYY-MM-DD`.
        pub date: String,
        pub category: Option<String>,
    }

    /// Full replacement of the user-editable fields.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: i64,
        pub description: String,
        pub date: String,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub description: String,
        pub date: String,
        pub category: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        /// Newest-created first.
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        /// The limit in currency minor units, must be > 0.
        pub amount_minor: i64,
        pub period: BudgetPeriod,
        /// ISO calendar date, `YYYY-MM-DD`; anchors the budget's month.
        pub start_date: String,
        /// Optional; must be after `start_date` when both parse.
        pub end_date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: String,
        pub amount_minor: i64,
        pub period: BudgetPeriod,
        pub start_date: String,
        pub end_date: Option<String>,
        /// Kept unchanged when absent.
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub amount_minor: i64,
        pub period: BudgetPeriod,
        pub start_date: String,
        pub end_date: Option<String>,
        pub is_active: bool,
        /// Derived from the live transaction set on every read.
        pub spent_minor: i64,
        /// Derived; clamped at 0 when over budget.
        pub remaining_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryView {
        pub year: i32,
        /// Short month label, one of `Jan`..`Dec`.
        pub month: String,
        pub budget_minor: i64,
        pub spent_minor: i64,
        pub remaining_minor: i64,
        /// Signed budget-minus-spent; negative means over budget.
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySliceView {
        pub name: String,
        pub value_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPointView {
        pub month: String,
        pub budget_minor: i64,
        pub spent_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        /// Sparse, calendar-ordered: only months with at least one budget.
        pub summaries: Vec<MonthlySummaryView>,
        /// First-occurrence order; `Other` absorbs uncategorized spending.
        pub categories: Vec<CategorySliceView>,
        /// Dense Jan..Dec series for the current year.
        pub series: Vec<MonthlyPointView>,
        pub total_spent_minor: i64,
        pub transaction_count: u64,
        pub avg_transaction_minor: i64,
        pub current_budget_minor: i64,
        pub net_change_minor: i64,
    }
}

pub mod report {
    use super::*;
    use crate::dashboard::{CategorySliceView, MonthlyPointView};
    use crate::transaction::TransactionView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportSummary {
        pub total_spent_minor: i64,
        pub monthly_budget_minor: i64,
        pub avg_transaction_minor: i64,
        pub transaction_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub generated_for: String,
        pub generated_at: DateTime<Utc>,
        pub summary: ReportSummary,
        pub categories: Vec<CategorySliceView>,
        /// Dense Jan..Dec overview for the current year.
        pub months: Vec<MonthlyPointView>,
        /// Newest-created first.
        pub history: Vec<TransactionView>,
    }
}

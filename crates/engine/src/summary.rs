//! Budget-vs-spending aggregation.
//!
//! Everything in this module is a pure function over snapshots already
//! fetched from the database: no I/O, no clock. The one place wall-clock
//! time matters (the "current" month for the dashboard delta) is passed in
//! by the caller as a [`YearMonth`].
//!
//! Records carry their dates as ISO `YYYY-MM-DD` strings; rows whose date
//! does not parse are skipped rather than failing the whole aggregation,
//! so one bad record never takes down a dashboard render.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{budgets::Budget, transactions::Transaction};

/// Fixed short month labels, calendar order.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label a transaction falls under when it has no category.
pub const OTHER_CATEGORY: &str = "Other";

/// Calendar-month bucket key.
///
/// Buckets are keyed by year *and* month: transactions from January 2024
/// and January 2025 land in different buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month (1 = January).
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Bucket key for an ISO `YYYY-MM-DD` date string.
    ///
    /// Returns `None` when the string does not parse; callers treat that as
    /// "no month match" and skip the record.
    pub fn parse(date: &str) -> Option<Self> {
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    /// The immediately preceding calendar month, crossing year boundaries.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn label(self) -> &'static str {
        MONTH_LABELS[(self.month - 1) as usize]
    }
}

/// Per-month join of budgets and spending. Derived on every read, never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub key: YearMonth,
    pub budget_minor: i64,
    pub spent_minor: i64,
    /// Clamped at 0 for display; over-budget months do not go negative.
    pub remaining_minor: i64,
}

impl MonthlySummary {
    /// Signed net (budget minus spent); negative means over budget.
    pub fn net_minor(&self) -> i64 {
        self.budget_minor - self.spent_minor
    }
}

/// One slice of the category distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub name: String,
    pub value_minor: i64,
}

/// Dense chart point: one of the 12 months of a given year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub budget_minor: i64,
    pub spent_minor: i64,
    pub net_minor: i64,
}

/// Headline numbers for the dashboard cards and the report summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_spent_minor: i64,
    pub transaction_count: u64,
    pub avg_transaction_minor: i64,
}

/// Everything the dashboard needs, computed from the two snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub summaries: Vec<MonthlySummary>,
    pub categories: Vec<CategorySlice>,
    pub series: Vec<MonthlyPoint>,
    pub totals: Totals,
    /// Total budget of the current month, 0 when none is defined.
    pub current_budget_minor: i64,
    pub net_change_minor: i64,
}

/// Spending totals bucketed by calendar month. Rows with unparseable dates
/// are skipped.
pub fn monthly_spending(transactions: &[Transaction]) -> BTreeMap<YearMonth, i64> {
    let mut spent = BTreeMap::new();
    for tx in transactions {
        let Some(key) = YearMonth::parse(&tx.date) else {
            continue;
        };
        *spent.entry(key).or_insert(0) += tx.amount_minor;
    }
    spent
}

fn budget_by_month(budgets: &[Budget]) -> BTreeMap<YearMonth, i64> {
    let mut budgeted = BTreeMap::new();
    for budget in budgets {
        let Some(key) = YearMonth::parse(&budget.start_date) else {
            continue;
        };
        *budgeted.entry(key).or_insert(0) += budget.amount_minor;
    }
    budgeted
}

/// Joins budgets with spending per calendar month.
///
/// The output is sparse: only months with at least one budget appear, in
/// calendar order regardless of input order. A budget month without
/// transactions yields `spent = 0`; spending in a month without budgets is
/// omitted entirely.
pub fn monthly_summaries(transactions: &[Transaction], budgets: &[Budget]) -> Vec<MonthlySummary> {
    let spent = monthly_spending(transactions);

    budget_by_month(budgets)
        .into_iter()
        .map(|(key, budget_minor)| {
            let spent_minor = spent.get(&key).copied().unwrap_or(0);
            MonthlySummary {
                key,
                budget_minor,
                spent_minor,
                remaining_minor: (budget_minor - spent_minor).max(0),
            }
        })
        .collect()
}

/// Groups transaction amounts by category label.
///
/// Slices appear in first-occurrence order; missing or empty categories
/// accumulate under [`OTHER_CATEGORY`]. The sum over all slices equals the
/// sum over all input amounts.
pub fn by_category(transactions: &[Transaction]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();
    for tx in transactions {
        let name = tx
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(OTHER_CATEGORY);

        match slices.iter_mut().find(|slice| slice.name == name) {
            Some(slice) => slice.value_minor += tx.amount_minor,
            None => slices.push(CategorySlice {
                name: name.to_string(),
                value_minor: tx.amount_minor,
            }),
        }
    }
    slices
}

/// Dense 12-entry series for one calendar year, for charts and the report's
/// monthly overview table. Months without records carry zeros so the series
/// always spans Jan..Dec.
pub fn monthly_series(
    transactions: &[Transaction],
    budgets: &[Budget],
    year: i32,
) -> Vec<MonthlyPoint> {
    let spent = monthly_spending(transactions);
    let budgeted = budget_by_month(budgets);

    (1..=12)
        .map(|month| {
            let key = YearMonth { year, month };
            let budget_minor = budgeted.get(&key).copied().unwrap_or(0);
            let spent_minor = spent.get(&key).copied().unwrap_or(0);
            MonthlyPoint {
                month: key.label(),
                budget_minor,
                spent_minor,
                net_minor: budget_minor - spent_minor,
            }
        })
        .collect()
}

/// Month-over-month change of the net (budget minus spent).
///
/// The previous month is found by calendar arithmetic on the bucket key, so
/// a January summary is compared against December of the previous year. If
/// either month is absent from the sparse sequence the delta is 0.
pub fn net_change(summaries: &[MonthlySummary], current: YearMonth) -> i64 {
    let net_for = |key: YearMonth| {
        summaries
            .iter()
            .find(|summary| summary.key == key)
            .map(MonthlySummary::net_minor)
    };

    match (net_for(current), net_for(current.pred())) {
        (Some(current_net), Some(previous_net)) => current_net - previous_net,
        _ => 0,
    }
}

/// Headline totals over a transaction snapshot. The average uses integer
/// division and is 0 for an empty set.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let total_spent_minor: i64 = transactions.iter().map(|tx| tx.amount_minor).sum();
    let transaction_count = transactions.len() as u64;
    let avg_transaction_minor = if transaction_count == 0 {
        0
    } else {
        total_spent_minor / transaction_count as i64
    };

    Totals {
        total_spent_minor,
        transaction_count,
        avg_transaction_minor,
    }
}

/// Assembles the full dashboard from the two snapshots.
pub fn dashboard(
    transactions: &[Transaction],
    budgets: &[Budget],
    current: YearMonth,
) -> Dashboard {
    let summaries = monthly_summaries(transactions, budgets);
    let current_budget_minor = summaries
        .iter()
        .find(|summary| summary.key == current)
        .map(|summary| summary.budget_minor)
        .unwrap_or(0);
    let net_change_minor = net_change(&summaries, current);

    Dashboard {
        categories: by_category(transactions),
        series: monthly_series(transactions, budgets, current.year),
        totals: totals(transactions),
        current_budget_minor,
        net_change_minor,
        summaries,
    }
}

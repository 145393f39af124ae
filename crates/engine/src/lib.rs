//! Domain engine for the finance tracker.
//!
//! Owns the persisted entities (transactions, budgets) and every derived
//! read: the dashboard and the report are recomputed from fresh snapshots
//! on each call, so stored records never carry stale aggregates.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

pub use budgets::{Budget, Period};
pub use error::EngineError;
pub use summary::{
    CategorySlice, Dashboard, MonthlyPoint, MonthlySummary, OTHER_CATEGORY, Totals, YearMonth,
};
pub use transactions::{MAX_DESCRIPTION_LEN, Transaction};

pub mod budgets;
mod error;
pub mod summary;
pub mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// A budget together with its derived spending figures.
///
/// `spent_minor` is the live transaction total of the calendar month the
/// budget starts in; `remaining_minor` clamps at 0 when over budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent_minor: i64,
    pub remaining_minor: i64,
}

/// Everything the report export renders, section by section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub totals: Totals,
    pub current_budget_minor: i64,
    pub categories: Vec<CategorySlice>,
    pub months: Vec<MonthlyPoint>,
    /// Newest-created first, same order as the transaction list endpoint.
    pub history: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Wraps an already-open connection. The engine never opens or owns
    /// connection state itself; callers hand in the scoped handle.
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub async fn list_transactions(&self, owner: &str) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::Owner.eq(owner))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn transaction(&self, owner: &str, id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        if model.owner != owner {
            return Err(EngineError::KeyNotFound(
                "transaction not exists".to_string(),
            ));
        }

        Transaction::try_from(model)
    }

    pub async fn new_transaction(
        &self,
        owner: &str,
        amount_minor: i64,
        description: String,
        date: String,
        category: Option<String>,
    ) -> ResultEngine<Transaction> {
        let tx = Transaction::new(
            owner.to_string(),
            amount_minor,
            description,
            date,
            category,
            Utc::now(),
        )?;
        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;

        Ok(tx)
    }

    /// Replaces the user-editable fields of a transaction.
    pub async fn update_transaction(
        &self,
        owner: &str,
        id: Uuid,
        amount_minor: i64,
        description: String,
        date: String,
        category: Option<String>,
    ) -> ResultEngine<Transaction> {
        let existing = self.transaction(owner, id).await?;

        transactions::validate_amount(amount_minor)?;
        transactions::validate_description(&description)?;
        transactions::validate_date(&date)?;

        let updated = Transaction {
            amount_minor,
            description,
            date,
            category,
            updated_at: Utc::now(),
            ..existing
        };
        transactions::ActiveModel::from(&updated)
            .update(&self.database)
            .await?;

        Ok(updated)
    }

    pub async fn delete_transaction(&self, owner: &str, id: Uuid) -> ResultEngine<()> {
        // Ownership check before the delete touches anything.
        let existing = self.transaction(owner, id).await?;
        transactions::Entity::delete_by_id(existing.id.to_string())
            .exec(&self.database)
            .await?;

        Ok(())
    }

    /// Budgets with their derived spending, newest-created first.
    pub async fn list_budgets(&self, owner: &str) -> ResultEngine<Vec<BudgetStatus>> {
        let budgets = self.budget_records(owner).await?;
        let transactions = self.list_transactions(owner).await?;
        let spending = summary::monthly_spending(&transactions);

        Ok(budgets
            .into_iter()
            .map(|budget| status_for(budget, &spending))
            .collect())
    }

    pub async fn budget(&self, owner: &str, id: Uuid) -> ResultEngine<BudgetStatus> {
        let budget = self.budget_record(owner, id).await?;
        let transactions = self.list_transactions(owner).await?;
        let spending = summary::monthly_spending(&transactions);

        Ok(status_for(budget, &spending))
    }

    pub async fn new_budget(
        &self,
        owner: &str,
        category: String,
        amount_minor: i64,
        period: Period,
        start_date: String,
        end_date: Option<String>,
    ) -> ResultEngine<Budget> {
        let budget = Budget::new(
            owner.to_string(),
            category,
            amount_minor,
            period,
            start_date,
            end_date,
            Utc::now(),
        )?;
        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;

        Ok(budget)
    }

    /// Replaces the user-editable fields of a budget. `is_active` is kept
    /// unchanged when `None`.
    pub async fn update_budget(
        &self,
        owner: &str,
        id: Uuid,
        category: String,
        amount_minor: i64,
        period: Period,
        start_date: String,
        end_date: Option<String>,
        is_active: Option<bool>,
    ) -> ResultEngine<Budget> {
        let existing = self.budget_record(owner, id).await?;

        transactions::validate_amount(amount_minor)?;
        budgets::validate_fields(&category, &start_date, end_date.as_deref())?;

        let updated = Budget {
            category,
            amount_minor,
            period,
            start_date,
            end_date,
            is_active: is_active.unwrap_or(existing.is_active),
            updated_at: Utc::now(),
            ..existing
        };
        budgets::ActiveModel::from(&updated)
            .update(&self.database)
            .await?;

        Ok(updated)
    }

    pub async fn delete_budget(&self, owner: &str, id: Uuid) -> ResultEngine<()> {
        let existing = self.budget_record(owner, id).await?;
        budgets::Entity::delete_by_id(existing.id.to_string())
            .exec(&self.database)
            .await?;

        Ok(())
    }

    /// Recomputes the dashboard from fresh snapshots.
    ///
    /// The two reads are independent; a record created between them is
    /// visible to one snapshot only. Acceptable for a dashboard refresh.
    pub async fn dashboard(&self, owner: &str, current: YearMonth) -> ResultEngine<Dashboard> {
        let transactions = self.list_transactions(owner).await?;
        let budgets = self.budget_records(owner).await?;

        Ok(summary::dashboard(&transactions, &budgets, current))
    }

    /// Assembles every report section from fresh snapshots.
    pub async fn report(&self, owner: &str, current: YearMonth) -> ResultEngine<Report> {
        let transactions = self.list_transactions(owner).await?;
        let budgets = self.budget_records(owner).await?;

        let summaries = summary::monthly_summaries(&transactions, &budgets);
        let current_budget_minor = summaries
            .iter()
            .find(|s| s.key == current)
            .map(|s| s.budget_minor)
            .unwrap_or(0);

        Ok(Report {
            totals: summary::totals(&transactions),
            current_budget_minor,
            categories: summary::by_category(&transactions),
            months: summary::monthly_series(&transactions, &budgets, current.year),
            history: transactions,
        })
    }

    async fn budget_records(&self, owner: &str) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::Owner.eq(owner))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Budget::try_from).collect()
    }

    async fn budget_record(&self, owner: &str, id: Uuid) -> ResultEngine<Budget> {
        let model = budgets::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
        if model.owner != owner {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }

        Budget::try_from(model)
    }
}

// A budget counts the whole spending of the month its start date falls in;
// there is no category match between the two record kinds.
fn status_for(budget: Budget, spending: &BTreeMap<YearMonth, i64>) -> BudgetStatus {
    let spent_minor = YearMonth::parse(&budget.start_date)
        .and_then(|key| spending.get(&key).copied())
        .unwrap_or(0);
    let remaining_minor = (budget.amount_minor - spent_minor).max(0);
    BudgetStatus {
        budget,
        spent_minor,
        remaining_minor,
    }
}

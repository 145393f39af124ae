//! Budget records.
//!
//! A `Budget` sets a spending limit for a category over a period, anchored
//! at its start date. `spent`/`remaining` are never stored; the summary
//! module derives both from the live transaction snapshot on every read.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions::validate_amount};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "invalid budget period: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner: String,
    pub category: String,
    /// The limit, in currency minor units.
    pub amount_minor: i64,
    pub period: Period,
    /// ISO calendar date (`YYYY-MM-DD`); anchors the budget's month bucket.
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        owner: String,
        category: String,
        amount_minor: i64,
        period: Period,
        start_date: String,
        end_date: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        validate_amount(amount_minor)?;
        validate_fields(&category, &start_date, end_date.as_deref())?;

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            category,
            amount_minor,
            period,
            start_date,
            end_date,
            is_active: true,
            created_at,
            updated_at: created_at,
        })
    }
}

pub(crate) fn validate_fields(
    category: &str,
    start_date: &str,
    end_date: Option<&str>,
) -> ResultEngine<()> {
    if category.trim().is_empty() {
        return Err(EngineError::Validation("category is required".to_string()));
    }
    if start_date.trim().is_empty() {
        return Err(EngineError::Validation(
            "start_date is required".to_string(),
        ));
    }

    // The ordering check only applies when both endpoints parse; dates the
    // aggregator will skip anyway are not rejected here.
    if let Some(end) = end_date {
        let start = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d");
        let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d");
        if let (Ok(start), Ok(end)) = (start, end) {
            if end <= start {
                return Err(EngineError::Validation(
                    "end_date must be after start_date".to_string(),
                ));
            }
        }
    }

    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub category: String,
    pub amount_minor: i64,
    pub period: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            owner: ActiveValue::Set(budget.owner.clone()),
            category: ActiveValue::Set(budget.category.clone()),
            amount_minor: ActiveValue::Set(budget.amount_minor),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
            start_date: ActiveValue::Set(budget.start_date.clone()),
            end_date: ActiveValue::Set(budget.end_date.clone()),
            is_active: ActiveValue::Set(budget.is_active),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            owner: model.owner,
            category: model.category,
            amount_minor: model.amount_minor,
            period: Period::try_from(model.period.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

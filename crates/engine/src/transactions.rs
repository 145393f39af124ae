//! Transaction records.
//!
//! A `Transaction` is a single spending event entered by its owner. The
//! calendar date travels as the ISO string the client submitted; the
//! summary module parses it on read and skips records it cannot place.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Upper bound on the description field.
pub const MAX_DESCRIPTION_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner: String,
    pub amount_minor: i64,
    pub description: String,
    /// ISO calendar date (`YYYY-MM-DD`) as entered by the client.
    pub date: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        owner: String,
        amount_minor: i64,
        description: String,
        date: String,
        category: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        validate_amount(amount_minor)?;
        validate_description(&description)?;
        validate_date(&date)?;

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            amount_minor,
            description,
            date,
            category,
            created_at,
            updated_at: created_at,
        })
    }
}

pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::Validation(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> ResultEngine<()> {
    if description.trim().is_empty() {
        return Err(EngineError::Validation(
            "description is required".to_string(),
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_date(date: &str) -> ResultEngine<()> {
    if date.trim().is_empty() {
        return Err(EngineError::Validation("date is required".to_string()));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub amount_minor: i64,
    pub description: String,
    pub date: String,
    pub category: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            owner: ActiveValue::Set(tx.owner.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            owner: model.owner,
            amount_minor: model.amount_minor,
            description: model.description,
            date: model.date,
            category: model.category,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

//! Budgets API endpoints
//!
//! Budget views carry `spent_minor`/`remaining_minor` derived from the live
//! transaction snapshot; nothing is read from stored aggregates.

use api_types::budget::{BudgetListResponse, BudgetNew, BudgetPeriod, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_period(period: engine::Period) -> BudgetPeriod {
    match period {
        engine::Period::Weekly => BudgetPeriod::Weekly,
        engine::Period::Monthly => BudgetPeriod::Monthly,
        engine::Period::Yearly => BudgetPeriod::Yearly,
    }
}

fn engine_period(period: BudgetPeriod) -> engine::Period {
    match period {
        BudgetPeriod::Weekly => engine::Period::Weekly,
        BudgetPeriod::Monthly => engine::Period::Monthly,
        BudgetPeriod::Yearly => engine::Period::Yearly,
    }
}

fn view(status: engine::BudgetStatus) -> BudgetView {
    let budget = status.budget;
    BudgetView {
        id: budget.id,
        category: budget.category,
        amount_minor: budget.amount_minor,
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        is_active: budget.is_active,
        spent_minor: status.spent_minor,
        remaining_minor: status.remaining_minor,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state.engine.list_budgets(&user.username).await?;

    Ok(Json(BudgetListResponse {
        budgets: budgets.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .new_budget(
            &user.username,
            payload.category,
            payload.amount_minor,
            engine_period(payload.period),
            payload.start_date,
            payload.end_date,
        )
        .await?;

    // Re-read through the status path so the response carries the derived
    // spending of the month the budget landed in.
    let status = state.engine.budget(&user.username, budget.id).await?;
    Ok((StatusCode::CREATED, Json(view(status))))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let status = state.engine.budget(&user.username, id).await?;

    Ok(Json(view(status)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    state
        .engine
        .update_budget(
            &user.username,
            id,
            payload.category,
            payload.amount_minor,
            engine_period(payload.period),
            payload.start_date,
            payload.end_date,
            payload.is_active,
        )
        .await?;

    let status = state.engine.budget(&user.username, id).await?;
    Ok(Json(view(status)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.username, id).await?;

    Ok(StatusCode::OK)
}

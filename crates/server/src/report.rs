//! Report export endpoints
//!
//! `/report` returns the data of every section the client renders into a
//! document (summary, category table, monthly overview, history);
//! `/report/transactions.csv` streams the history as a CSV attachment.

use api_types::report::{ReportResponse, ReportSummary};
use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use csv::Writer;
use serde::Serialize;

use crate::{
    ServerError,
    dashboard::{current_month, point_view, slice_view},
    server::ServerState,
    transactions, user,
};

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ReportResponse>, ServerError> {
    let report = state.engine.report(&user.username, current_month()).await?;

    Ok(Json(ReportResponse {
        generated_for: user.username,
        generated_at: Utc::now(),
        summary: ReportSummary {
            total_spent_minor: report.totals.total_spent_minor,
            monthly_budget_minor: report.current_budget_minor,
            avg_transaction_minor: report.totals.avg_transaction_minor,
            transaction_count: report.totals.transaction_count,
        },
        categories: report.categories.into_iter().map(slice_view).collect(),
        months: report.months.into_iter().map(point_view).collect(),
        history: report.history.into_iter().map(transactions::view).collect(),
    }))
}

#[derive(Serialize)]
struct ExportRow {
    date: String,
    description: String,
    category: String,
    amount_minor: i64,
    id: String,
}

pub async fn transactions_csv(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let report = state.engine.report(&user.username, current_month()).await?;

    let mut writer = Writer::from_writer(vec![]);
    for tx in report.history {
        writer
            .serialize(ExportRow {
                date: tx.date,
                description: tx.description,
                category: tx
                    .category
                    .unwrap_or_else(|| engine::OTHER_CATEGORY.to_string()),
                amount_minor: tx.amount_minor,
                id: tx.id.to_string(),
            })
            .map_err(|err| ServerError::Internal(format!("failed to serialize export row: {err}")))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| ServerError::Internal(format!("failed to finalize export: {err}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        data,
    ))
}

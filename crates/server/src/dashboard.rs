//! Dashboard API endpoint

use api_types::dashboard::{
    CategorySliceView, DashboardResponse, MonthlyPointView, MonthlySummaryView,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::YearMonth;

use crate::{ServerError, server::ServerState, user};

/// The one place wall-clock time enters the aggregation: the bucket key of
/// the current month, used for the headline budget and the net delta.
pub(crate) fn current_month() -> YearMonth {
    YearMonth::from_date(Utc::now().date_naive())
}

pub(crate) fn summary_view(summary: engine::MonthlySummary) -> MonthlySummaryView {
    MonthlySummaryView {
        year: summary.key.year,
        month: summary.key.label().to_string(),
        budget_minor: summary.budget_minor,
        spent_minor: summary.spent_minor,
        remaining_minor: summary.remaining_minor,
        net_minor: summary.net_minor(),
    }
}

pub(crate) fn slice_view(slice: engine::CategorySlice) -> CategorySliceView {
    CategorySliceView {
        name: slice.name,
        value_minor: slice.value_minor,
    }
}

pub(crate) fn point_view(point: engine::MonthlyPoint) -> MonthlyPointView {
    MonthlyPointView {
        month: point.month.to_string(),
        budget_minor: point.budget_minor,
        spent_minor: point.spent_minor,
        net_minor: point.net_minor,
    }
}

/// Handle requests for the owner's dashboard.
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let dash = state
        .engine
        .dashboard(&user.username, current_month())
        .await?;

    Ok(Json(DashboardResponse {
        summaries: dash.summaries.into_iter().map(summary_view).collect(),
        categories: dash.categories.into_iter().map(slice_view).collect(),
        series: dash.series.into_iter().map(point_view).collect(),
        total_spent_minor: dash.totals.total_spent_minor,
        transaction_count: dash.totals.transaction_count,
        avg_transaction_minor: dash.totals.avg_transaction_minor,
        current_budget_minor: dash.current_budget_minor,
        net_change_minor: dash.net_change_minor,
    }))
}

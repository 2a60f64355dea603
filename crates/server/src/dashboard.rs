use api_types::dashboard::{CategoryExpense, Dashboard, WindowTotals};
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{ServerState, Tenant},
};

fn map_totals(totals: engine::WindowTotals) -> WindowTotals {
    WindowTotals {
        total_income: totals.total_income,
        total_expense: totals.total_expense,
    }
}

/// Totals as of today in the configured timezone.
pub async fn get(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
) -> Result<Json<Dashboard>, ServerError> {
    let dashboard = state.engine.dashboard(tenant.id, state.today()).await?;
    let expenses_by_category = dashboard
        .expenses_by_category
        .into_iter()
        .map(|expense| CategoryExpense {
            category_id: expense.category_id,
            category_name: expense.category_name,
            total_expense: expense.total_expense,
        })
        .collect();

    Ok(Json(Dashboard {
        expenses_by_category,
        all_time: map_totals(dashboard.all_time),
        prev_year: map_totals(dashboard.prev_year),
        year_to_date: map_totals(dashboard.year_to_date),
    }))
}

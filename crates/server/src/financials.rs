//! Financials API endpoints

use api_types::{
    IdQuery, RowCount, Rows,
    financial::{FinancialList, FinancialNew, FinancialRowView, FinancialView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{FinancialListFilter, NewFinancial, SortDirection, SortKey};

use crate::{
    ServerError,
    server::{ServerState, Tenant, positive_id},
};

fn map_financial(financial: engine::Financial) -> FinancialView {
    FinancialView {
        id: financial.id,
        name: financial.name,
        amount: financial.amount,
        id_account: financial.account_id,
        user_id: financial.user_id,
        category_id: financial.category_id,
        subcategory_id: financial.subcategory_id,
        transaction_date: financial.transaction_date,
        kind: financial.kind.as_str().to_string(),
        is_transfer: financial.is_transfer,
    }
}

fn map_row(row: engine::FinancialRow) -> FinancialRowView {
    FinancialRowView {
        id: row.id,
        name: row.name,
        amount: row.amount,
        id_account: row.id_account,
        user_id: row.user_id,
        category_id: row.category_id,
        subcategory_id: row.subcategory_id,
        transaction_date: row.transaction_date,
        kind: row.kind.as_str().to_string(),
        is_transfer: row.is_transfer,
        account_name: row.account_name,
        category_name: row.category_name,
        subcategory_name: row.subcategory_name,
    }
}

pub async fn list(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<FinancialList>,
) -> Result<Json<Rows<FinancialRowView>>, ServerError> {
    let filter = FinancialListFilter {
        account_id: query
            .id_account
            .map(|id| positive_id("id_account", id))
            .transpose()?,
        sort_key: query
            .sort_key
            .as_deref()
            .map(SortKey::try_from)
            .transpose()?
            .unwrap_or_default(),
        direction: query
            .sort_direction
            .as_deref()
            .map(SortDirection::try_from)
            .transpose()?
            .unwrap_or_default(),
    };

    let page = state
        .engine
        .list_financials(tenant.id, state.page(query.page, query.limit), &filter)
        .await?;

    Ok(Json(Rows {
        rows: page.rows.into_iter().map(map_row).collect(),
        row_count: page.row_count,
    }))
}

/// Records one financial, or the two legs of a transfer.
pub async fn create(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<FinancialNew>,
) -> Result<(StatusCode, Json<Rows<FinancialView>>), ServerError> {
    let input = NewFinancial {
        name: payload.name,
        amount: payload.amount,
        account_id: payload.id_account,
        account_to_id: payload.id_account_to,
        category_id: payload.id_category,
        subcategory_id: payload.id_subcategory,
        transaction_date: payload.transaction_date,
        kind: payload.kind,
    };
    let rows = state
        .engine
        .new_financial(tenant.id, input)
        .await?
        .into_iter()
        .map(map_financial)
        .collect();

    Ok((StatusCode::CREATED, Json(Rows::created(rows))))
}

pub async fn delete(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RowCount>, ServerError> {
    let id = positive_id("id", query.id)?;
    let row_count = state.engine.delete_financial(tenant.id, id).await?;
    Ok(Json(RowCount { row_count }))
}

//! Accounts API endpoints.

use api_types::{
    IdQuery, ListQuery, RowCount, Rows,
    account::{AccountBalanceView, AccountNew, AccountView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    ServerError,
    server::{ServerState, Tenant, positive_id},
};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        user_id: account.user_id,
    }
}

pub async fn list(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Rows<AccountBalanceView>>, ServerError> {
    let page = state
        .engine
        .list_accounts(
            tenant.id,
            state.page(query.page, query.limit),
            query.search.as_deref(),
        )
        .await?;
    let rows = page
        .rows
        .into_iter()
        .map(|account| AccountBalanceView {
            id: account.id,
            name: account.name,
            net_total: account.net_total,
        })
        .collect();

    Ok(Json(Rows {
        rows,
        row_count: page.row_count,
    }))
}

pub async fn create(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<Rows<AccountView>>), ServerError> {
    let account = state
        .engine
        .new_account(tenant.id, payload.name.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Rows::created(vec![map_account(account)])),
    ))
}

pub async fn delete(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RowCount>, ServerError> {
    let id = positive_id("id", query.id)?;
    let row_count = state.engine.delete_account(tenant.id, id).await?;
    Ok(Json(RowCount { row_count }))
}

//! Categories API endpoints.

use api_types::{
    IdQuery, ListQuery, RowCount, Rows,
    category::{CategoryNew, CategoryView},
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

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        user_id: category.user_id,
    }
}

pub async fn list(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Rows<CategoryView>>, ServerError> {
    let page = state
        .engine
        .list_categories(
            tenant.id,
            state.page(query.page, query.limit),
            query.search.as_deref(),
        )
        .await?;

    Ok(Json(Rows {
        rows: page.rows.into_iter().map(map_category).collect(),
        row_count: page.row_count,
    }))
}

pub async fn create(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<Rows<CategoryView>>), ServerError> {
    let category = state
        .engine
        .new_category(tenant.id, payload.category.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Rows::created(vec![map_category(category)])),
    ))
}

/// Removes the category and its subcategories; 409 while financials use it.
pub async fn delete(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RowCount>, ServerError> {
    let id = positive_id("id", query.id)?;
    let row_count = state.engine.delete_category(tenant.id, id).await?;
    Ok(Json(RowCount { row_count }))
}

use api_types::{
    IdQuery, RowCount, Rows,
    subcategory::{SubcategoryList, SubcategoryNew, SubcategoryView},
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

fn map_subcategory(subcategory: engine::Subcategory) -> SubcategoryView {
    SubcategoryView {
        id: subcategory.id,
        name: subcategory.name,
        category_id: subcategory.category_id,
        user_id: subcategory.user_id,
    }
}

pub async fn list(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<SubcategoryList>,
) -> Result<Json<Rows<SubcategoryView>>, ServerError> {
    let category_id = query
        .id_category
        .map(|id| positive_id("id_category", id))
        .transpose()?;
    let page = state
        .engine
        .list_subcategories(
            tenant.id,
            category_id,
            state.page(query.page, query.limit),
            query.search.as_deref(),
        )
        .await?;

    Ok(Json(Rows {
        rows: page.rows.into_iter().map(map_subcategory).collect(),
        row_count: page.row_count,
    }))
}

pub async fn create(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Json(payload): Json<SubcategoryNew>,
) -> Result<(StatusCode, Json<Rows<SubcategoryView>>), ServerError> {
    let subcategory = state
        .engine
        .new_subcategory(
            tenant.id,
            payload.category_id,
            payload.subcategory.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Rows::created(vec![map_subcategory(subcategory)])),
    ))
}

pub async fn delete(
    Extension(tenant): Extension<Tenant>,
    State(state): State<ServerState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RowCount>, ServerError> {
    let id = positive_id("id", query.id)?;
    let row_count = state.engine.delete_subcategory(tenant.id, id).await?;
    Ok(Json(RowCount { row_count }))
}

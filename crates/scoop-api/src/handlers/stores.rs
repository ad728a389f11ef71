//! Store API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::store::{NewStore, Store};

use crate::error::ApiResult;
use crate::state::AppState;

/// List stores
///
/// GET /api/v1/store
pub async fn list_stores(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<serde_json::Value>> {
    let stores = state.stores.list(&pagination).await?;
    let total = state.stores.count().await?;
    let (limit, offset) = pagination.clamped();

    Ok(Json(serde_json::json!({
        "meta": {
            "totalRecords": total,
            "count": limit,
            "start": offset,
        },
        "items": stores,
    })))
}

/// Get a single store
///
/// GET /api/v1/store/:id
pub async fn get_store(State(state): State<AppState>, Path(id): Path<Id>) -> ApiResult<Json<Store>> {
    Ok(Json(state.stores.get(id).await?))
}

/// Create a store
///
/// POST /api/v1/store
pub async fn create_store(
    State(state): State<AppState>,
    Json(payload): Json<NewStore>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let store = state.stores.insert(payload).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// Replace a store
///
/// PUT /api/v1/store/:id
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(payload): Json<NewStore>,
) -> ApiResult<Json<Store>> {
    payload.validate()?;
    Ok(Json(state.stores.update(id, payload).await?))
}

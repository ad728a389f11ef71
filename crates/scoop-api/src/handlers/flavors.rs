//! Flavor API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::flavor::{Flavor, NewFlavor};

use crate::error::ApiResult;
use crate::state::AppState;

/// List flavors
///
/// GET /api/v1/flavor
pub async fn list_flavors(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<serde_json::Value>> {
    let flavors = state.flavors.list(&pagination).await?;
    let total = state.flavors.count().await?;
    let (limit, offset) = pagination.clamped();

    Ok(Json(serde_json::json!({
        "meta": {
            "totalRecords": total,
            "count": limit,
            "start": offset,
        },
        "items": flavors,
    })))
}

/// Get a single flavor
///
/// GET /api/v1/flavor/:id
pub async fn get_flavor(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Flavor>> {
    Ok(Json(state.flavors.get(id).await?))
}

/// Create a flavor
///
/// POST /api/v1/flavor
pub async fn create_flavor(
    State(state): State<AppState>,
    Json(payload): Json<NewFlavor>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let flavor = state.flavors.insert(payload).await?;
    Ok((StatusCode::CREATED, Json(flavor)))
}

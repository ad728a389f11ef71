//! Ingredient API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use scoop_core::pagination::Pagination;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    /// Space-separated search terms
    pub search: Option<String>,
}

/// List or search ingredients
///
/// GET /api/v1/ingredient
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<serde_json::Value>> {
    let terms: Vec<String> = query
        .search
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let ingredients = state.ingredients.search(&pagination, &terms).await?;

    Ok(Json(serde_json::json!({ "items": ingredients })))
}

//! User API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use scoop_auth::password;
use scoop_auth::store::NewIdentity;
use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_core::types::UserStatus;
use scoop_models::user::{NewUser, UpdateUser, User};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// Create a user
///
/// POST /api/v1/user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let password = payload
        .password
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("password is required".into()))?;
    let password_hash = password::hash_password(password)?;

    let mut user = state
        .identity
        .insert(NewIdentity {
            uuid: Uuid::new_v4(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            status: payload.status.unwrap_or(UserStatus::Unverified),
            password_hash,
        })
        .await?;

    let user_id = persisted_id(&user)?;
    for name in &payload.permissions {
        let grant = state.identity.add_permission(user_id, name).await?;
        user.permissions.push(grant);
    }

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a single user
///
/// GET /api/v1/user/:uuid
pub async fn get_user(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let mut user = state.identity.get_by_uuid(uuid).await?;
    user.permissions = state
        .identity
        .list_permissions(persisted_id(&user)?)
        .await?;
    Ok(Json(user))
}

/// List users
///
/// GET /api/v1/user
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<serde_json::Value>> {
    let users = state.identity.list(&pagination).await?;
    let total = state.identity.count().await?;
    let (limit, offset) = pagination.clamped();

    Ok(Json(serde_json::json!({
        "meta": {
            "totalRecords": total,
            "count": limit,
            "start": offset,
            "sortBy": pagination.sort_by,
        },
        "items": users,
    })))
}

/// Partially update a user
///
/// PATCH /api/v1/user/:uuid
pub async fn partial_update_user(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<Json<User>> {
    payload.validate()?;
    let user = state.identity.get_by_uuid(uuid).await?;
    let updated = state
        .identity
        .update(persisted_id(&user)?, &payload)
        .await?;
    Ok(Json(updated))
}

/// Delete a user
///
/// DELETE /api/v1/user/:uuid
pub async fn delete_user(
    State(state): State<AppState>,
    current: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let user = state.identity.get_by_uuid(uuid).await?;
    let user_id = persisted_id(&user)?;

    state.identity.remove_all_permissions(user_id).await?;
    if state.identity.delete(user_id).await? {
        tracing::info!(actor = %current.uuid, subject = %uuid, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("user".into()))
    }
}

#[derive(Debug, Deserialize)]
pub struct GrantPermission {
    pub name: String,
}

/// Grant a capability to a user
///
/// POST /api/v1/user/:uuid/permission
pub async fn add_user_permission(
    State(state): State<AppState>,
    current: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<GrantPermission>,
) -> ApiResult<impl IntoResponse> {
    let user = state.identity.get_by_uuid(uuid).await?;
    let grant = state
        .identity
        .add_permission(persisted_id(&user)?, &payload.name)
        .await?;
    tracing::info!(actor = %current.uuid, subject = %uuid, capability = %payload.name, "capability granted");
    Ok((StatusCode::CREATED, Json(grant)))
}

/// Revoke a single grant by its id
///
/// DELETE /api/v1/user/:uuid/permission/:id
pub async fn remove_user_permission(
    State(state): State<AppState>,
    Path((uuid, grant_id)): Path<(Uuid, Id)>,
) -> ApiResult<StatusCode> {
    // the path uuid scopes the guard; the grant id is the revocation handle
    state.identity.get_by_uuid(uuid).await?;
    if state.identity.remove_permission(grant_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("permission grant".into()))
    }
}

fn persisted_id(user: &User) -> ApiResult<Id> {
    user.id
        .ok_or_else(|| ApiError::Internal("store returned an unsaved user".into()))
}

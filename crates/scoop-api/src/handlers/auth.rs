//! Authentication handlers
//!
//! The two endpoints that mint session tokens: credential login and
//! one-time-token exchange. Everything else consumes tokens through the
//! session middleware.

use axum::{extract::Path, extract::State, Json};

use scoop_auth::jwt::SignedToken;
use scoop_models::user::Credentials;

use crate::error::ApiResult;
use crate::state::AppState;

/// Authenticate with email and password
///
/// POST /api/v1/auth
pub async fn create_auth(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<SignedToken>> {
    let user = state.credentials.verify_credentials(&credentials).await?;
    let signed = state.tokens.issue(&user)?;
    Ok(Json(signed))
}

/// Exchange a one-time auth token for a session token
///
/// GET /auth/:token
pub async fn auth_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<SignedToken>> {
    let user = state.credentials.resolve_one_time_token(&token).await?;
    let signed = state.tokens.issue(&user)?;
    Ok(Json(signed))
}

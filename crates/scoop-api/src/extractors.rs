//! Axum extractors for API handlers

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use scoop_auth::capability::CurrentUser;

use crate::error::ApiError;
use crate::middleware::AuthSession;

/// The authenticated identity, as resolved by the session middleware.
///
/// Extraction fails with the uniform unauthorized response when the route
/// was not wrapped by the session layer.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSession>()
            .map(|session| AuthenticatedUser(session.0.clone()))
            .ok_or(ApiError::Unauthorized)
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

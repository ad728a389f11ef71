//! Session and capability middleware
//!
//! `session_auth` wraps every protected route: it validates the bearer
//! token, resolves the subject against the identity store, and attaches
//! the result to the request under a module-private extension type, so
//! the compiler rather than a naming convention prevents key collisions.
//!
//! `capability_guard` is applied per route with that route's required
//! capability set; it reads the `:uuid` path parameter as the resource
//! owner for self-scoped checks.

use axum::{
    extract::{RawPathParams, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use scoop_auth::capability::CurrentUser;
use scoop_auth::error::AuthError;

use crate::error::ApiError;
use crate::state::AppState;

/// Request-scoped authenticated session, readable only through
/// [`crate::extractors::AuthenticatedUser`]
#[derive(Clone)]
pub(crate) struct AuthSession(pub CurrentUser);

/// Session middleware: every request past this point carries an
/// authenticated identity or has already been answered with `401`.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned());

    match state
        .authenticator
        .authenticate(authorization.as_deref())
        .await
    {
        Ok(user) => {
            request.extensions_mut().insert(AuthSession(user));
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// A route's required-capability set, carried as guard-layer state
#[derive(Clone, Copy)]
pub struct RequiredCapabilities(pub &'static [&'static str]);

/// Capability guard: allow the request through only if the authenticated
/// identity satisfies the route's required set.
pub async fn capability_guard(
    State(required): State<RequiredCapabilities>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let Some(session) = request.extensions().get::<AuthSession>() else {
        // the session layer did not run; treat as unauthenticated
        return ApiError::Unauthorized.into_response();
    };

    let owner = params
        .iter()
        .find(|(name, _)| *name == "uuid")
        .map(|(_, value)| value);

    if session.0.can(required.0, owner) {
        next.run(request).await
    } else {
        // the denial never names the required set
        ApiError::from(AuthError::PermissionDenied).into_response()
    }
}

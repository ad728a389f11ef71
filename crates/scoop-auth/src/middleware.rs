//! Session authentication
//!
//! [`Authenticator`] is the transport-agnostic core of the session
//! middleware: it takes the raw `Authorization` header value and produces
//! a [`CurrentUser`], or a distinct [`AuthError`] that the HTTP edge
//! collapses into one uniform unauthorized response.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::capability::CurrentUser;
use crate::error::AuthError;
use crate::jwt::{parse_bearer, TokenService};
use crate::store::{IdentityStore, StoreError};

/// Validates bearer tokens and resolves their subject to a live identity
pub struct Authenticator {
    tokens: Arc<TokenService>,
    store: Arc<dyn IdentityStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, store }
    }

    /// Authenticate a request from its `Authorization` header value.
    ///
    /// The token's permission snapshot is deliberately ignored: grants are
    /// re-read from the identity store so that a revocation takes effect
    /// on the next request, not at token expiry.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<CurrentUser, AuthError> {
        let header = authorization.ok_or(AuthError::MalformedHeader)?;
        let token = parse_bearer(header)?;
        let claims = self.tokens.verify(token)?;

        let uuid = Uuid::parse_str(&claims.uuid).map_err(|_| AuthError::IdentityNotFound)?;
        let user = match self.store.get_by_uuid(uuid).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AuthError::IdentityNotFound),
            Err(e) => return Err(AuthError::Internal(e.to_string())),
        };

        let id = user
            .id
            .ok_or_else(|| AuthError::Internal("store returned an unsaved user".into()))?;
        let permissions = self
            .store
            .list_permissions(id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        debug!(subject = %uuid, grants = permissions.len(), "session authenticated");

        Ok(CurrentUser {
            id,
            uuid: user.uuid,
            status: user.status,
            permissions,
        })
    }
}

//! Credential and one-time-token verification
//!
//! Both verification paths resolve to an identity with its live grant set
//! loaded, ready for token issuance. Every failure mode (unknown email,
//! wrong password, unknown or expired one-time token) collapses into
//! [`AuthError::CredentialInvalid`]; callers and clients never learn which
//! check failed.

use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;

use scoop_models::user::{Credentials, User};

use crate::error::AuthError;
use crate::store::{IdentityStore, StoreError};

const ONE_TIME_TOKEN_LENGTH: usize = 48;

/// Verifies credentials and one-time tokens against the identity store
pub struct CredentialService {
    store: Arc<dyn IdentityStore>,
    one_time_token_ttl: Duration,
}

impl CredentialService {
    pub fn new(store: Arc<dyn IdentityStore>, one_time_token_ttl_minutes: i64) -> Self {
        Self {
            store,
            one_time_token_ttl: Duration::minutes(one_time_token_ttl_minutes),
        }
    }

    /// Verify email+password and return the identity with live grants
    pub async fn verify_credentials(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self
            .store
            .get_by_credentials(credentials)
            .await
            .map_err(collapse)?;
        self.with_live_grants(user).await
    }

    /// Exchange a one-time token for the identity it was issued to.
    /// The token is consumed by the lookup.
    pub async fn resolve_one_time_token(&self, token: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .get_by_one_time_token(token)
            .await
            .map_err(collapse)?;
        self.with_live_grants(user).await
    }

    /// Generate and persist a fresh one-time token for an identity,
    /// replacing any previous one.
    pub async fn issue_one_time_token(&self, user: &User) -> Result<String, AuthError> {
        let user_id = user
            .id
            .ok_or_else(|| AuthError::Internal("cannot issue token for unsaved user".into()))?;

        let token = generate_one_time_token();
        let expires_at = Utc::now() + self.one_time_token_ttl;
        self.store
            .save_one_time_token(user_id, &token, expires_at)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(token)
    }

    async fn with_live_grants(&self, mut user: User) -> Result<User, AuthError> {
        let user_id = user
            .id
            .ok_or_else(|| AuthError::Internal("store returned an unsaved user".into()))?;
        user.permissions = self
            .store
            .list_permissions(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(user)
    }
}

fn collapse(err: StoreError) -> AuthError {
    match err {
        StoreError::NotFound | StoreError::Conflict(_) => AuthError::CredentialInvalid,
        StoreError::Backend(message) => AuthError::Internal(message),
    }
}

/// Opaque one-time token value
pub fn generate_one_time_token() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    (0..ONE_TIME_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password;
    use crate::store::{MemoryIdentityStore, NewIdentity};
    use scoop_core::types::UserStatus;
    use uuid::Uuid;

    async fn seeded() -> (Arc<MemoryIdentityStore>, User) {
        let store = Arc::new(MemoryIdentityStore::new());
        let user = store
            .insert(NewIdentity {
                uuid: Uuid::new_v4(),
                first_name: None,
                last_name: None,
                email: Some("u1@example.com".into()),
                phone: "+14045550001".into(),
                status: UserStatus::Verified,
                password_hash: password::hash_password("correct-horse-battery").unwrap(),
            })
            .await
            .unwrap();
        store
            .add_permission(user.id.unwrap(), "self:read")
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_verify_credentials_loads_live_grants() {
        let (store, user) = seeded().await;
        let service = CredentialService::new(store, 15);

        let verified = service
            .verify_credentials(&Credentials {
                email: "u1@example.com".into(),
                password: "correct-horse-battery".into(),
            })
            .await
            .unwrap();

        assert_eq!(verified.uuid, user.uuid);
        assert_eq!(verified.permissions.len(), 1);
        assert_eq!(verified.permissions[0].name(), "self:read");
    }

    #[tokio::test]
    async fn test_failure_modes_are_indistinguishable() {
        let (store, _) = seeded().await;
        let service = CredentialService::new(store, 15);

        let unknown = service
            .verify_credentials(&Credentials {
                email: "nobody@example.com".into(),
                password: "correct-horse-battery".into(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .verify_credentials(&Credentials {
                email: "u1@example.com".into(),
                password: "incorrect".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::CredentialInvalid));
        assert!(matches!(wrong, AuthError::CredentialInvalid));
    }

    #[tokio::test]
    async fn test_one_time_token_round_trip() {
        let (store, user) = seeded().await;
        let service = CredentialService::new(store, 15);

        let token = service.issue_one_time_token(&user).await.unwrap();
        assert_eq!(token.len(), ONE_TIME_TOKEN_LENGTH);

        let resolved = service.resolve_one_time_token(&token).await.unwrap();
        assert_eq!(resolved.uuid, user.uuid);
        assert_eq!(resolved.permissions.len(), 1);

        // consumed on first use
        assert!(matches!(
            service.resolve_one_time_token(&token).await,
            Err(AuthError::CredentialInvalid)
        ));
    }

    #[tokio::test]
    async fn test_unknown_one_time_token() {
        let (store, _) = seeded().await;
        let service = CredentialService::new(store, 15);

        assert!(matches!(
            service.resolve_one_time_token("never-issued").await,
            Err(AuthError::CredentialInvalid)
        ));
    }

    #[test]
    fn test_generated_tokens_are_distinct() {
        let a = generate_one_time_token();
        let b = generate_one_time_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

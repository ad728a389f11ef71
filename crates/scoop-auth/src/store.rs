//! Identity store abstraction
//!
//! The auth subsystem never talks to a database directly; it consumes this
//! trait. The production implementation lives in `scoop-db`;
//! [`MemoryIdentityStore`] backs tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_core::types::UserStatus;
use scoop_models::permission::{Permission, PermissionGrant};
use scoop_models::user::{Credentials, UpdateUser, User};

use crate::password;

/// Identity store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no matching record")]
    NotFound,

    #[error("duplicate {0}")]
    Conflict(&'static str),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Parameters for creating an identity
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub uuid: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub status: UserStatus,
    /// Argon2 hash, never the plaintext
    pub password_hash: String,
}

/// Identity and permission store.
///
/// Lookup methods do not populate `User::permissions`; callers that need
/// grants read them with [`IdentityStore::list_permissions`] so that
/// authorization always sees the live set.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert(&self, new: NewIdentity) -> Result<User, StoreError>;

    async fn update(&self, id: Id, update: &UpdateUser) -> Result<User, StoreError>;

    async fn get(&self, id: Id) -> Result<User, StoreError>;

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<User, StoreError>;

    async fn get_by_phone(&self, phone: &str) -> Result<User, StoreError>;

    /// Resolve credentials to an identity. Unknown email and wrong
    /// password are indistinguishable: both are `NotFound`.
    async fn get_by_credentials(&self, credentials: &Credentials) -> Result<User, StoreError>;

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, StoreError>;

    /// Hard-delete an identity; returns whether a row was removed
    async fn delete(&self, id: Id) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    async fn list_permissions(&self, user_id: Id) -> Result<Vec<PermissionGrant>, StoreError>;

    async fn add_permission(&self, user_id: Id, name: &str) -> Result<PermissionGrant, StoreError>;

    /// Revoke a single grant by its own id
    async fn remove_permission(&self, grant_id: Id) -> Result<bool, StoreError>;

    async fn remove_all_permissions(&self, user_id: Id) -> Result<(), StoreError>;

    /// Persist a one-time auth token for an identity. At most one live
    /// token per identity: saving again replaces the previous one.
    async fn save_one_time_token(
        &self,
        user_id: Id,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Resolve and consume a one-time token. Unknown, expired, and
    /// already-consumed tokens are all `NotFound`.
    async fn get_by_one_time_token(&self, token: &str) -> Result<User, StoreError>;
}

#[derive(Debug, Clone)]
struct Record {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<Record>,
    next_user_id: Id,
    next_grant_id: Id,
    permission_ids: HashMap<String, Id>,
    one_time_tokens: HashMap<String, (Id, DateTime<Utc>)>,
}

/// In-memory identity store for tests and local development
#[derive(Default)]
pub struct MemoryIdentityStore {
    inner: RwLock<Inner>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn permission_id(&mut self, name: &str) -> Id {
        if let Some(id) = self.permission_ids.get(name) {
            return *id;
        }
        let id = self.permission_ids.len() as Id + 1;
        self.permission_ids.insert(name.to_string(), id);
        id
    }

    fn record(&self, id: Id) -> Option<&Record> {
        self.users.iter().find(|r| r.user.id == Some(id))
    }

    fn record_mut(&mut self, id: Id) -> Option<&mut Record> {
        self.users.iter_mut().find(|r| r.user.id == Some(id))
    }
}

fn lock_err<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".into())
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn insert(&self, new: NewIdentity) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;

        if let Some(email) = &new.email {
            if inner
                .users
                .iter()
                .any(|r| r.user.email.as_deref() == Some(email.as_str()))
            {
                return Err(StoreError::Conflict("email"));
            }
        }
        if inner.users.iter().any(|r| r.user.phone == new.phone) {
            return Err(StoreError::Conflict("phone"));
        }

        inner.next_user_id += 1;
        let user = User {
            id: Some(inner.next_user_id),
            uuid: new.uuid,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            status: new.status,
            permissions: vec![],
            created_at: Some(Utc::now()),
        };
        inner.users.push(Record {
            user: user.clone(),
            password_hash: new.password_hash,
        });

        Ok(user)
    }

    async fn update(&self, id: Id, update: &UpdateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;

        if let Some(email) = &update.email {
            if inner
                .users
                .iter()
                .any(|r| r.user.id != Some(id) && r.user.email.as_deref() == Some(email.as_str()))
            {
                return Err(StoreError::Conflict("email"));
            }
        }

        let record = inner.record_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(first_name) = &update.first_name {
            record.user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            record.user.last_name = Some(last_name.clone());
        }
        if let Some(email) = &update.email {
            record.user.email = Some(email.clone());
        }
        if let Some(phone) = &update.phone {
            record.user.phone = phone.clone();
        }
        if let Some(status) = update.status {
            record.user.status = status;
        }

        Ok(record.user.clone())
    }

    async fn get(&self, id: Id) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        inner
            .record(id)
            .map(|r| r.user.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        inner
            .users
            .iter()
            .find(|r| r.user.uuid == uuid && r.user.status.can_login())
            .map(|r| r.user.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        inner
            .users
            .iter()
            .find(|r| r.user.phone == phone && r.user.status.can_login())
            .map(|r| r.user.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_credentials(&self, credentials: &Credentials) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        let record = inner
            .users
            .iter()
            .find(|r| {
                r.user.email.as_deref() == Some(credentials.email.as_str())
                    && r.user.status.can_login()
            })
            .ok_or(StoreError::NotFound)?;

        if !password::verify_password(&credentials.password, &record.password_hash) {
            return Err(StoreError::NotFound);
        }

        Ok(record.user.clone())
    }

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        let (limit, offset) = pagination.clamped();
        Ok(inner
            .users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|r| r.user.clone())
            .collect())
    }

    async fn delete(&self, id: Id) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let before = inner.users.len();
        inner.users.retain(|r| r.user.id != Some(id));
        Ok(inner.users.len() < before)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner.users.len() as i64)
    }

    async fn list_permissions(&self, user_id: Id) -> Result<Vec<PermissionGrant>, StoreError> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner
            .record(user_id)
            .map(|r| r.user.permissions.clone())
            .unwrap_or_default())
    }

    async fn add_permission(&self, user_id: Id, name: &str) -> Result<PermissionGrant, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let permission_id = inner.permission_id(name);
        inner.next_grant_id += 1;
        let grant_id = inner.next_grant_id;

        let record = inner.record_mut(user_id).ok_or(StoreError::NotFound)?;
        if record.user.permissions.iter().any(|g| g.name() == name) {
            return Err(StoreError::Conflict("permission"));
        }

        let grant = PermissionGrant::new(grant_id, Permission::new(permission_id, name));
        record.user.permissions.push(grant.clone());
        Ok(grant)
    }

    async fn remove_permission(&self, grant_id: Id) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        for record in inner.users.iter_mut() {
            let before = record.user.permissions.len();
            record.user.permissions.retain(|g| g.id != grant_id);
            if record.user.permissions.len() < before {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn remove_all_permissions(&self, user_id: Id) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let record = inner.record_mut(user_id).ok_or(StoreError::NotFound)?;
        record.user.permissions.clear();
        Ok(())
    }

    async fn save_one_time_token(
        &self,
        user_id: Id,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        if inner.record(user_id).is_none() {
            return Err(StoreError::NotFound);
        }
        // one live token per identity
        inner.one_time_tokens.retain(|_, (id, _)| *id != user_id);
        inner
            .one_time_tokens
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn get_by_one_time_token(&self, token: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let (user_id, expires_at) = inner
            .one_time_tokens
            .remove(token)
            .ok_or(StoreError::NotFound)?;
        if expires_at < Utc::now() {
            return Err(StoreError::NotFound);
        }
        inner
            .record(user_id)
            .map(|r| r.user.clone())
            .ok_or(StoreError::NotFound)
    }
}

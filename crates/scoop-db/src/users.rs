//! User repository
//!
//! The PostgreSQL implementation of the identity store consumed by the
//! auth subsystem: user directory operations, permission grants, and
//! one-time auth tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scoop_auth::password;
use scoop_auth::store::{IdentityStore, NewIdentity, StoreError};
use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_core::types::UserStatus;
use scoop_models::permission::{Permission, PermissionGrant};
use scoop_models::user::{Credentials, UpdateUser, User};

use crate::repository::store_error;

const USER_COLUMNS: &str = "id, uuid, first_name, last_name, email, phone, status, created_at";

/// User database row
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    uuid: Uuid,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: String,
    status: i16,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        let status = UserStatus::from_i16(self.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown user status {}", self.status)))?;
        Ok(User {
            id: Some(self.id),
            uuid: self.uuid,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            status,
            permissions: vec![],
            created_at: Some(self.created_at),
        })
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    hashed_password: String,
    #[sqlx(flatten)]
    user: UserRow,
}

/// User repository implementation
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for UserRepository {
    async fn insert(&self, new: NewIdentity) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (uuid, first_name, last_name, email, phone, status, hashed_password, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new.uuid)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.status.as_i16())
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        row.into_user()
    }

    async fn update(&self, id: Id, update: &UpdateUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                email      = COALESCE($4, email),
                phone      = COALESCE($5, phone),
                status     = COALESCE($6, status)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(update.status.map(|s| s.as_i16()))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        row.into_user()
    }

    async fn get(&self, id: Id) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        row.into_user()
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE uuid = $1 AND status <> $2",
        ))
        .bind(uuid)
        .bind(UserStatus::Deleted.as_i16())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        row.into_user()
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1 AND status <> $2",
        ))
        .bind(phone)
        .bind(UserStatus::Deleted.as_i16())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        row.into_user()
    }

    async fn get_by_credentials(&self, credentials: &Credentials) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT hashed_password, {USER_COLUMNS} FROM users WHERE email = $1 AND status <> $2",
        ))
        .bind(&credentials.email)
        .bind(UserStatus::Deleted.as_i16())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        // wrong password and unknown email are the same outcome
        if !password::verify_password(&credentials.password, &row.hashed_password) {
            return Err(StoreError::NotFound);
        }

        row.user.into_user()
    }

    async fn list(&self, pagination: &Pagination) -> Result<Vec<User>, StoreError> {
        // sort keys are allow-listed; anything else falls back to created_at
        let order = match pagination.sort_by.as_deref() {
            Some("firstName") => "first_name",
            Some("lastName") => "last_name",
            Some("email") => "email",
            Some("status") => "status",
            _ => "created_at",
        };
        let (limit, offset) = pagination.clamped();

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {order} LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn delete(&self, id: Id) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query("DELETE FROM user_permissions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(count)
    }

    async fn list_permissions(&self, user_id: Id) -> Result<Vec<PermissionGrant>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, i64, String)>(
            r#"
            SELECT up.id, p.id, p.name
              FROM user_permissions AS up
              JOIN permissions AS p ON up.permission_id = p.id
             WHERE up.user_id = $1
             ORDER BY p.name DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(grant_id, permission_id, name)| {
                PermissionGrant::new(grant_id, Permission::new(permission_id, name))
            })
            .collect())
    }

    async fn add_permission(&self, user_id: Id, name: &str) -> Result<PermissionGrant, StoreError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            INSERT INTO user_permissions (user_id, permission_id, created_at)
            SELECT $1, p.id, NOW() FROM permissions AS p WHERE p.name = $2
            RETURNING id, permission_id
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        // no row inserted: the permission name does not exist
        .ok_or(StoreError::NotFound)?;

        Ok(PermissionGrant::new(row.0, Permission::new(row.1, name)))
    }

    async fn remove_permission(&self, grant_id: Id) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user_permissions WHERE id = $1")
            .bind(grant_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_all_permissions(&self, user_id: Id) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM user_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn save_one_time_token(
        &self,
        user_id: Id,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // one live token per identity: the upsert is atomic per user row
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (user_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE
                SET token = EXCLUDED.token,
                    expires_at = EXCLUDED.expires_at,
                    created_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn get_by_one_time_token(&self, token: &str) -> Result<User, StoreError> {
        // consuming read: the token row is deleted whether or not the
        // subsequent user fetch succeeds
        let user_id: i64 = sqlx::query_scalar(
            "DELETE FROM auth_tokens WHERE token = $1 AND expires_at > NOW() RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)?;

        self.get(user_id).await
    }
}

//! Repository error types shared by the persistence layer

use scoop_auth::store::StoreError;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Map a sqlx error into the identity-store error space, recognizing
/// unique-constraint violations by constraint name.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) => match db.constraint() {
            Some("uk_users_email") => StoreError::Conflict("email"),
            Some("uk_users_phone") => StoreError::Conflict("phone"),
            Some("uk_user_permissions_user_permission") => StoreError::Conflict("permission"),
            _ => StoreError::Backend(err.to_string()),
        },
        _ => StoreError::Backend(err.to_string()),
    }
}

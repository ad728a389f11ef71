//! API error handling
//!
//! Maps the error types of the lower layers onto the HTTP status
//! contract. Every authentication or authorization failure collapses into
//! one uniform `401` with no detail about which check failed; the
//! distinct variant is logged server-side instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use scoop_auth::error::AuthError;
use scoop_auth::store::StoreError;
use scoop_db::repository::RepositoryError;
use scoop_sms::SmsError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unauthorized,
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::NotFound(what) => format!("{} not found", what),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Conflict(message) => message.clone(),
            // internal detail stays in the logs
            ApiError::Internal(_) => "Internal Server Error".to_string(),
        };
        (self.status_code(), Json(ErrorBody { message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthorized() {
            // distinct variants are logged for operability, never surfaced
            tracing::warn!(error = %err, "authentication failure");
            ApiError::Unauthorized
        } else {
            tracing::error!(error = %err, "auth infrastructure failure");
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("record".into()),
            StoreError::Conflict(what) => ApiError::Conflict(format!("duplicate {}", what)),
            StoreError::Backend(message) => {
                tracing::error!(error = %message, "identity store failure");
                ApiError::Internal(message)
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => ApiError::NotFound(what),
            RepositoryError::Conflict(message) => ApiError::Conflict(message),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<SmsError> for ApiError {
    fn from(err: SmsError) -> Self {
        tracing::error!(error = %err, "sms delivery failure");
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_collapse_to_unauthorized() {
        for err in [
            AuthError::MalformedHeader,
            AuthError::SignatureInvalid,
            AuthError::AlgorithmMismatch,
            AuthError::TokenExpired,
            AuthError::IdentityNotFound,
            AuthError::PermissionDenied,
            AuthError::CredentialInvalid,
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_infrastructure_failures_are_500() {
        let api: ApiError = AuthError::SigningFailure("corrupt key".into()).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let api: ApiError = StoreError::Backend("pool closed".into()).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let api: ApiError = StoreError::Conflict("email").into();
        assert_eq!(api.status_code(), StatusCode::CONFLICT);
    }
}

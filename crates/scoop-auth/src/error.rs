//! Authentication error taxonomy
//!
//! Every verification failure collapses into one uniform unauthorized
//! outcome at the HTTP edge; the distinct variants exist for server-side
//! logging and tests. `SigningFailure` means corrupted or missing key
//! material and is startup-blocking rather than a per-request error.

use thiserror::Error;

/// Authentication and authorization errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("token signature invalid")]
    SignatureInvalid,

    #[error("token algorithm not in the allow-list")]
    AlgorithmMismatch,

    #[error("token expired")]
    TokenExpired,

    #[error("identity not found")]
    IdentityNotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("signing failure: {0}")]
    SigningFailure(String),

    #[error("invalid credentials")]
    CredentialInvalid,

    #[error("internal auth failure: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this failure collapses into the uniform `401` response.
    /// Infrastructure faults surface as `500` instead.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::SigningFailure(_) | AuthError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_split() {
        assert!(AuthError::MalformedHeader.is_unauthorized());
        assert!(AuthError::SignatureInvalid.is_unauthorized());
        assert!(AuthError::AlgorithmMismatch.is_unauthorized());
        assert!(AuthError::TokenExpired.is_unauthorized());
        assert!(AuthError::IdentityNotFound.is_unauthorized());
        assert!(AuthError::PermissionDenied.is_unauthorized());
        assert!(AuthError::CredentialInvalid.is_unauthorized());
        assert!(!AuthError::SigningFailure("bad key".into()).is_unauthorized());
        assert!(!AuthError::Internal("pool closed".into()).is_unauthorized());
    }
}

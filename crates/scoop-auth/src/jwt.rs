//! Session token issuance and verification
//!
//! Tokens are RS256-signed JWTs carrying the identity UUID, a snapshot of
//! its permission grants at issuance, the issuer, and an expiry 12 hours
//! out (configurable). The signing algorithm is allow-listed on the verify
//! side: a token whose header claims anything but RS256 is rejected before
//! its signature is considered.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use scoop_models::user::User;

use crate::error::AuthError;

/// RSA keypair for token signing and verification.
///
/// Loaded once at process start and injected into [`TokenService`]; there
/// is no global key state and no runtime rotation. Load failures are
/// [`AuthError::SigningFailure`] and must abort startup.
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    /// Build from PEM-encoded RSA keys
    pub fn from_rsa_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AuthError> {
        Ok(Self {
            encoding: EncodingKey::from_rsa_pem(private_pem)
                .map_err(|e| AuthError::SigningFailure(format!("private key: {}", e)))?,
            decoding: DecodingKey::from_rsa_pem(public_pem)
                .map_err(|e| AuthError::SigningFailure(format!("public key: {}", e)))?,
        })
    }

    /// Build from PEM files on disk
    pub fn from_files(private_path: &str, public_path: &str) -> Result<Self, AuthError> {
        let private_pem = std::fs::read(private_path)
            .map_err(|e| AuthError::SigningFailure(format!("{}: {}", private_path, e)))?;
        let public_pem = std::fs::read(public_path)
            .map_err(|e| AuthError::SigningFailure(format!("{}: {}", public_path, e)))?;
        Self::from_rsa_pem(&private_pem, &public_pem)
    }
}

/// One permission grant as embedded in token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantClaim {
    /// Grant row id
    pub id: i64,
    /// Capability name, `resource:action` or `self:action`
    pub name: String,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity UUID
    pub uuid: String,
    /// Permission grants at issuance time
    pub permissions: Vec<GrantClaim>,
    /// Issuer
    pub iss: String,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// A freshly issued token together with its expiry
#[derive(Debug, Clone, Serialize)]
pub struct SignedToken {
    pub token: String,
    #[serde(rename = "expires")]
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens
pub struct TokenService {
    keys: SigningKeys,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(keys: SigningKeys, issuer: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a signed session token for a verified identity.
    ///
    /// The permission snapshot is taken from `user.permissions` as loaded
    /// by the caller; it is fixed in the token from here on.
    pub fn issue(&self, user: &User) -> Result<SignedToken, AuthError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = Claims {
            uuid: user.uuid.to_string(),
            permissions: user
                .permissions
                .iter()
                .map(|grant| GrantClaim {
                    id: grant.id,
                    name: grant.permission.name.clone(),
                })
                .collect(),
            iss: self.issuer.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.keys.encoding)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))?;

        Ok(SignedToken { token, expires_at })
    }

    /// Verify a token string and return its claims.
    ///
    /// The algorithm allow-list is pinned to RS256; expiry and issuer are
    /// validated. Callers must still resolve the subject against the
    /// identity store before trusting it.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data =
            decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                    | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                        AuthError::AlgorithmMismatch
                    }
                    _ => AuthError::SignatureInvalid,
                }
            })?;

        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly two whitespace-separated parts with a
/// `Bearer` scheme; anything else is rejected before any token parsing.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use scoop_core::types::UserStatus;
    use scoop_models::permission::{Permission, PermissionGrant};
    use uuid::Uuid;

    const PRIVATE_PEM: &str = include_str!("../fixtures/private.pem");
    const PUBLIC_PEM: &str = include_str!("../fixtures/public.pem");
    const OTHER_PRIVATE_PEM: &str = include_str!("../fixtures/other_private.pem");
    const OTHER_PUBLIC_PEM: &str = include_str!("../fixtures/other_public.pem");

    fn keys() -> SigningKeys {
        SigningKeys::from_rsa_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).unwrap()
    }

    fn service() -> TokenService {
        TokenService::new(keys(), "scoopshop.com", 12)
    }

    fn user_with(names: &[&str]) -> User {
        User {
            id: Some(1),
            uuid: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            email: Some("u@example.com".into()),
            phone: "+14045551212".into(),
            status: UserStatus::Verified,
            permissions: names
                .iter()
                .enumerate()
                .map(|(i, name)| PermissionGrant::new(i as i64 + 1, Permission::new(i as i64 + 1, *name)))
                .collect(),
            created_at: None,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();
        let user = user_with(&["self:read", "self:write"]);

        let signed = service.issue(&user).unwrap();
        let claims = service.verify(&signed.token).unwrap();

        assert_eq!(claims.uuid, user.uuid.to_string());
        assert_eq!(claims.iss, "scoopshop.com");
        assert_eq!(claims.exp, signed.expires_at.timestamp());
        assert_eq!(
            claims.permissions,
            vec![
                GrantClaim { id: 1, name: "self:read".into() },
                GrantClaim { id: 2, name: "self:write".into() },
            ]
        );
    }

    #[test]
    fn test_round_trip_random_identities() {
        let pool = [
            "user:read",
            "user:write",
            "self:read",
            "self:write",
            "store:read",
            "store:write",
            "flavor:read",
            "flavor:write",
            "ingredient:read",
        ];
        let service = service();
        let mut rng = rand::rng();

        for _ in 0..100 {
            let n = rng.random_range(0..pool.len());
            let names: Vec<&str> = pool[..n].to_vec();
            let user = user_with(&names);

            let signed = service.issue(&user).unwrap();
            let claims = service.verify(&signed.token).unwrap();

            assert_eq!(claims.uuid, user.uuid.to_string());
            let claimed: Vec<&str> = claims.permissions.iter().map(|g| g.name.as_str()).collect();
            assert_eq!(claimed, names);
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        // A negative TTL puts the expiry well past any validation leeway
        let service = TokenService::new(keys(), "scoopshop.com", -1);
        let signed = service.issue(&user_with(&["self:read"])).unwrap();

        match service.verify(&signed.token) {
            Err(AuthError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other.map(|c| c.uuid)),
        }
    }

    #[test]
    fn test_foreign_key_rejected() {
        let signer = TokenService::new(
            SigningKeys::from_rsa_pem(OTHER_PRIVATE_PEM.as_bytes(), OTHER_PUBLIC_PEM.as_bytes())
                .unwrap(),
            "scoopshop.com",
            12,
        );
        let signed = signer.issue(&user_with(&["user:read"])).unwrap();

        match service().verify(&signed.token) {
            Err(AuthError::SignatureInvalid) => {}
            other => panic!("expected SignatureInvalid, got {:?}", other.map(|c| c.uuid)),
        }
    }

    #[test]
    fn test_non_rsa_algorithm_rejected() {
        // An HS256 token keyed with the public key bytes: the classic
        // algorithm-confusion probe
        let claims = Claims {
            uuid: Uuid::new_v4().to_string(),
            permissions: vec![],
            iss: "scoopshop.com".into(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(PUBLIC_PEM.as_bytes()),
        )
        .unwrap();

        match service().verify(&token) {
            Err(AuthError::AlgorithmMismatch) => {}
            other => panic!("expected AlgorithmMismatch, got {:?}", other.map(|c| c.uuid)),
        }
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let foreign = TokenService::new(keys(), "another-issuer.com", 12);
        let signed = foreign.issue(&user_with(&["user:read"])).unwrap();
        assert!(service().verify(&signed.token).is_err());
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc123").unwrap(), "abc123");

        for bad in ["Token abc", "Bearer", "Bearer a b", "", "bearer abc"] {
            assert!(
                matches!(parse_bearer(bad), Err(AuthError::MalformedHeader)),
                "should reject {:?}",
                bad
            );
        }
    }
}

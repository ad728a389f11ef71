//! # scoop-auth
//!
//! Authentication and capability authorization for the Scoops backend.
//!
//! ## Components
//!
//! - RSA signing keys, loaded once at startup and injected ([`SigningKeys`])
//! - Session token issuance and verification ([`TokenService`])
//! - The two-tier capability model and permission guard ([`capability`])
//! - Credential and one-time-token verification ([`CredentialService`])
//! - The identity store abstraction ([`IdentityStore`]) with an in-memory
//!   implementation for tests and local development

pub mod capability;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod store;

pub use capability::{satisfies, Capability, CurrentUser};
pub use credentials::CredentialService;
pub use error::AuthError;
pub use jwt::{parse_bearer, Claims, GrantClaim, SignedToken, SigningKeys, TokenService};
pub use middleware::Authenticator;
pub use store::{IdentityStore, MemoryIdentityStore, NewIdentity, StoreError};

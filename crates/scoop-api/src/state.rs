//! Application state
//!
//! All collaborators are held behind `Arc`'d trait objects so handlers
//! depend on interfaces, not on concrete backends; the server binary
//! wires the PostgreSQL and Twilio implementations, tests wire the
//! in-memory ones.

use std::sync::Arc;

use scoop_auth::credentials::CredentialService;
use scoop_auth::jwt::TokenService;
use scoop_auth::middleware::Authenticator;
use scoop_auth::store::IdentityStore;
use scoop_core::config::AppConfig;
use scoop_db::catalog::{FlavorCatalog, IngredientCatalog, StoreCatalog};
use scoop_sms::Messager;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub authenticator: Arc<Authenticator>,
    pub credentials: Arc<CredentialService>,
    pub identity: Arc<dyn IdentityStore>,
    pub stores: Arc<dyn StoreCatalog>,
    pub flavors: Arc<dyn FlavorCatalog>,
    pub ingredients: Arc<dyn IngredientCatalog>,
    pub messager: Arc<dyn Messager>,
}

//! Scoops API server
//!
//! Wires the PostgreSQL repositories, the Twilio messager, and the auth
//! subsystem into the router and serves it. Signing-key problems abort
//! startup: a process that cannot sign tokens must not serve traffic.

use std::sync::Arc;

use anyhow::Context;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoop_api::AppState;
use scoop_auth::credentials::CredentialService;
use scoop_auth::jwt::{SigningKeys, TokenService};
use scoop_auth::middleware::Authenticator;
use scoop_core::config::AppConfig;
use scoop_db::{
    Database, DatabaseConfig, FlavorRepository, IngredientRepository, StoreRepository,
    UserRepository,
};
use scoop_sms::TwilioMessager;

mod health;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("failed to load configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Scoops API"
    );

    // key material is load-bearing; refuse to start without it
    let keys = SigningKeys::from_files(
        &config.auth.private_key_path,
        &config.auth.public_key_path,
    )
    .context("signing keys unavailable")?;

    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.pool_size,
        connect_timeout_secs: config.database.connect_timeout_seconds,
        ..Default::default()
    };
    let db = Database::connect(&db_config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let pool = db.pool().clone();
    let users = Arc::new(UserRepository::new(pool.clone()));
    let tokens = Arc::new(TokenService::new(
        keys,
        config.auth.issuer.clone(),
        config.auth.token_ttl_hours,
    ));
    let authenticator = Arc::new(Authenticator::new(tokens.clone(), users.clone()));
    let credentials = Arc::new(CredentialService::new(
        users.clone(),
        config.auth.one_time_token_ttl_minutes,
    ));
    let messager = Arc::new(TwilioMessager::new(
        reqwest::Client::new(),
        config.sms.account_sid.clone(),
        config.sms.auth_token.clone(),
        config.sms.from_number.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        tokens,
        authenticator,
        credentials,
        identity: users,
        stores: Arc::new(StoreRepository::new(pool.clone())),
        flavors: Arc::new(FlavorRepository::new(pool.clone())),
        ingredients: Arc::new(IngredientRepository::new(pool)),
        messager,
    };

    let app = scoop_api::router(state)
        .merge(health::router(db))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scoop_server=debug,scoop_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

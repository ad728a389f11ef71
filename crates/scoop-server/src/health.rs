//! Health check endpoints
//!
//! Liveness reports process health; readiness additionally pings the
//! database, since every authenticated request depends on it.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use scoop_db::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct HealthReport {
    status: HealthStatus,
    version: &'static str,
    uptime_seconds: u64,
    database: HealthStatus,
    timestamp: chrono::DateTime<chrono::Utc>,
}

struct HealthState {
    db: Database,
    started: Instant,
}

/// Health check routes (no auth required)
pub fn router(db: Database) -> Router {
    let state = Arc::new(HealthState {
        db,
        started: Instant::now(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .with_state(state)
}

async fn liveness() -> StatusCode {
    StatusCode::OK
}

async fn readiness(State(state): State<Arc<HealthState>>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn health(State(state): State<Arc<HealthState>>) -> (StatusCode, Json<HealthReport>) {
    let database = match state.db.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(_) => HealthStatus::Unhealthy,
    };
    let status = database;

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started.elapsed().as_secs(),
        database,
        timestamp: chrono::Utc::now(),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(report))
}

//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db_pool {
        Some(pool) => match pool.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                warn!(error = %e, "Health check could not reach the database");
                "unreachable"
            }
        },
        None => "memory",
    };

    Json(HealthResponse {
        status: if database == "unreachable" { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: database.to_string(),
        realtime: state.realtime.stats(),
    })
}

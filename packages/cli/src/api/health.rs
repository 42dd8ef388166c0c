// ABOUTME: Liveness endpoint
// ABOUTME: Reports service name, version and whether the database answers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use givelink_api::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, health, database) = match givelink_storage::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, "healthy", "ok"),
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": health,
            "timestamp": Utc::now().timestamp(),
            "version": env!("CARGO_PKG_VERSION"),
            "service": "givelink",
            "database": database
        })),
    )
}

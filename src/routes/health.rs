// src/routes/health.rs

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{models::HealthResp, AppState};

/// The one endpoint that reports a database failure as an HTTP error.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResp>) {
    match state.executor.provider().check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResp { status: "healthy", database: "connected" }),
        ),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResp { status: "unhealthy", database: "disconnected" }),
            )
        }
    }
}

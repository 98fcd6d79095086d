// handlers/public/health.rs - GET /health handler

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: &'static str,
}

/// GET /health - liveness plus a round trip to the document store
pub async fn health_get(State(state): State<Arc<AppState>>) -> ApiResult<Health> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
        database: "ok",
    }))
}

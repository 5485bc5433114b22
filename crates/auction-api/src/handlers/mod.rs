//! Keep-alive endpoint handlers
//!
//! Deployment platforms ping these to keep the process warm and to watch
//! its health.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, Json};

use auction_service::dto::{HealthResponse, HomeResponse, StatusResponse};

use crate::state::AppState;

/// Banner with uptime
///
/// GET /
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse::running(state.uptime_seconds()))
}

/// Health check for external monitors
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    Json(HealthResponse::healthy(state.uptime_seconds(), timestamp))
}

/// Raw process status
///
/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse::running(
        state.start_epoch(),
        state.uptime_seconds(),
    ))
}

//! Route definitions

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Create the keep-alive router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status))
}

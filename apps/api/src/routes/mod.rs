pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", any(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(handlers::MAX_BODY_BYTES))
        .with_state(state)
}

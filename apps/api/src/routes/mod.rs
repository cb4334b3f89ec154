pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Single-page form
        .route("/", get(handlers::handle_index))
        .route("/feedback", post(handlers::handle_submit_form))
        // JSON API
        .route("/api/v1/feedback", post(handlers::handle_generate))
        .with_state(state)
}

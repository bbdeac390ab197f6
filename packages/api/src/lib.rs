// ABOUTME: HTTP API layer for Plotpad providing the run_code endpoint and routing
// ABOUTME: Maps execution session outcomes onto the JSON wire contract

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use plotpad_runner::SessionManager;

pub mod handlers;
pub mod response;

/// Shared application state containing the session manager
pub type AppState = Arc<SessionManager>;

/// Creates the Plotpad API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/run_code", post(handlers::run_code))
        .route("/health", get(handlers::health))
        .with_state(state)
}

//! # HRNav API
//!
//! HTTP handlers, DTOs, and the router for the navigation menu service.

pub mod handlers;
pub mod response;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, menu};
use crate::state::AppState;

/// All API routes with state attached. CORS is layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Menu routes
        .route("/api/v1/menu/view", post(menu::view))
        .route("/api/v1/menu/toggle", post(menu::toggle))
        .route("/api/v1/menu/activate", post(menu::activate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

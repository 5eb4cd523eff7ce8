// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{health_handler, medical_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::assistant::Assistant;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Questions have no length limit of their own; this only bounds buffering.
/// Larger bodies get a JSON 413 from the handler.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

pub fn create_router(assistant: Arc<Assistant>) -> Router {
    let state = AppState { assistant };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/medical", post(medical_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}

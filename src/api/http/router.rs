// src/api/http/router.rs
// HTTP router composition for the queue API

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    advance_handler, current_handler, health_handler, notify_handler, notify_status_handler,
    ping_handler, reset_handler, root_handler, sync_handler,
};
use crate::state::AppState;

pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))

        // Queue
        .route("/current", get(current_handler))
        .route("/advance", post(advance_handler))
        .route("/reset", post(reset_handler))
        .route("/sync", get(sync_handler))

        // Notifications
        .route("/notify", post(notify_handler))
        .route("/notify/status", get(notify_status_handler))

        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

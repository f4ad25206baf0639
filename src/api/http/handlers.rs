// src/api/http/handlers.rs
// Queue HTTP handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::ApiResult;
use crate::api::types::{
    AdvanceQuery, HealthResponse, NotifyResponse, QueueResponse, ResetResponse, SyncResponse,
    now,
};
use crate::notify::DispatchReport;
use crate::queue::{DurableSync, QueueView};
use crate::state::AppState;

/// Liveness message
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Agent queue API running" }))
}

/// Keep-alive endpoint for hosts that idle out quiet services
pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "timestamp": now(),
    }))
}

pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now(),
        environment: app_state.config.status(),
        queue_position: app_state.rotator.position().await,
    })
}

/// Serves the current agent and moves the queue on; optionally notifies
/// everyone of their new position.
pub async fn advance_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<AdvanceQuery>,
) -> ApiResult<Json<QueueResponse>> {
    let view = app_state.rotator.advance().await?;

    let results = if query.notify {
        dispatch(&app_state, &view).await.results
    } else {
        Vec::new()
    };

    Ok(Json(QueueResponse::from_view(view, results)))
}

/// Current queue without advancing
pub async fn current_handler(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<QueueResponse>> {
    let view = app_state.rotator.peek().await?;
    Ok(Json(QueueResponse::from_view(view, Vec::new())))
}

/// Notifies every agent of their position in the current queue
pub async fn notify_handler(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<NotifyResponse>> {
    let view = app_state.rotator.peek().await?;
    let report = dispatch(&app_state, &view).await;
    let statistics = report.stats();

    Ok(Json(NotifyResponse {
        message: format!("Notifications processed for {} agents", statistics.total),
        current_agent: view.current.agent.name.clone(),
        statistics,
        notification_results: report.results,
        cancelled: report.cancelled,
        timestamp: now(),
    }))
}

pub async fn reset_handler(State(app_state): State<Arc<AppState>>) -> Json<ResetResponse> {
    let outcome = app_state.rotator.reset().await;
    Json(ResetResponse {
        message: "Queue reset to first agent".to_string(),
        durable_synced: outcome == DurableSync::Synced,
        timestamp: now(),
    })
}

/// Durable vs in-memory position, for diagnosing divergence
pub async fn sync_handler(State(app_state): State<Arc<AppState>>) -> Json<SyncResponse> {
    Json(SyncResponse {
        report: app_state.rotator.sync_report().await,
        timestamp: now(),
    })
}

pub async fn notify_status_handler(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    let config = &app_state.config;
    let configured = app_state.dispatcher.is_some();

    Json(json!({
        "notifications_available": configured,
        "evolution_api_url_configured": config.has_evolution_url(),
        "evolution_api_key_configured": config.has_evolution_key(),
        "delay_range_secs": [config.notify_min_delay_secs, config.notify_max_delay_secs],
        "send_timeout_secs": config.notify_send_timeout_secs,
        "total_timeout_secs": config.notify_total_timeout_secs,
    }))
}

async fn dispatch(app_state: &AppState, view: &QueueView) -> DispatchReport {
    match &app_state.dispatcher {
        Some(dispatcher) => {
            info!("Dispatching queue notifications");
            dispatcher
                .dispatch_within(view, app_state.config.notify_total_timeout())
                .await
        }
        None => {
            warn!("Notifications requested but Evolution API is not configured");
            DispatchReport::default()
        }
    }
}

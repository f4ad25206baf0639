// src/api/types.rs
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::ConfigStatus;
use crate::notify::{DispatchStats, NotificationStatus};
use crate::queue::{QueueView, QueuedAgent, SyncReport};

/// Query for `POST /advance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvanceQuery {
    #[serde(default)]
    pub notify: bool,
}

/// Body of `/advance` and `/current`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    pub current_agent: QueuedAgent,
    pub upcoming_agents: Vec<QueuedAgent>,
    pub timestamp: String,
    pub roster_changed: bool,
    #[serde(default)]
    pub notification_results: Vec<NotificationStatus>,
}

impl QueueResponse {
    pub fn from_view(view: QueueView, notification_results: Vec<NotificationStatus>) -> Self {
        Self {
            current_agent: view.current,
            upcoming_agents: view.upcoming,
            timestamp: now(),
            roster_changed: view.changed,
            notification_results,
        }
    }
}

/// Body of `POST /notify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub message: String,
    pub current_agent: String,
    pub statistics: DispatchStats,
    pub notification_results: Vec<NotificationStatus>,
    pub cancelled: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub environment: ConfigStatus,
    pub queue_position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub durable_synced: bool,
    pub timestamp: String,
}

/// Body of `GET /sync`
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    #[serde(flatten)]
    pub report: SyncReport,
    pub timestamp: String,
}

pub fn now() -> String {
    Utc::now().to_rfc3339()
}

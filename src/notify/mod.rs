// src/notify/mod.rs
// Outbound agent notifications

pub mod delay;
pub mod dispatcher;
pub mod evolution;
pub mod message;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::queue::Agent;

pub use delay::{DelayPolicy, NoDelay, UniformDelay};
pub use dispatcher::{DispatchReport, DispatchStats, NotificationDispatcher};
pub use evolution::EvolutionNotifier;

/// Error types for a single send
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("Gateway rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Send timed out after {0}s")]
    Timeout(u64),

    #[error("Dispatch cancelled")]
    Cancelled,
}

impl NotifyError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NotifyError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outbound messaging gateway
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the gateway status code on success
    async fn send(&self, agent: &Agent, message: &str) -> Result<u16, NotifyError>;
}

/// Per-agent delivery record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStatus {
    pub name: String,
    pub phone: String,
    pub success: bool,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

impl NotificationStatus {
    pub fn from_outcome(agent: &Agent, outcome: Result<u16, NotifyError>) -> Self {
        match outcome {
            Ok(status) => Self {
                name: agent.name.clone(),
                phone: agent.phone.clone(),
                success: true,
                error: None,
                status_code: Some(status),
            },
            Err(e) => Self {
                name: agent.name.clone(),
                phone: agent.phone.clone(),
                success: false,
                status_code: e.status_code(),
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_record_shape() {
        let agent = Agent::new("Ana", "ana@example.com", "5511999");
        let failed = NotificationStatus::from_outcome(
            &agent,
            Err(NotifyError::Rejected {
                status: 400,
                body: "bad number".into(),
            }),
        );

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["phone"], "5511999");
        assert_eq!(json["success"], false);
        assert_eq!(json["status_code"], 400);
        assert!(json.get("agent_name").is_none());
    }
}

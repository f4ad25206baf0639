// src/roster/mod.rs
// Agent roster collaborator

pub mod ingest;
pub mod sheets;

use async_trait::async_trait;

use crate::queue::RosterSnapshot;
use crate::sheets::SheetsError;

pub use ingest::{RowRejection, agents_from_rows};

pub use sheets::{SheetsRoster, UnconfiguredRoster};

/// Error types for roster retrieval
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Roster source not configured")]
    NotConfigured,

    #[error("Failed to read roster: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Malformed roster: {0}")]
    Malformed(#[from] RowRejection),

    #[error("Roster source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current ordered list of agents on demand.
#[async_trait]
pub trait AgentRoster: Send + Sync {
    async fn list_agents(&self) -> Result<RosterSnapshot, RosterError>;

    fn is_configured(&self) -> bool {
        true
    }
}

// src/roster/sheets.rs
// Roster read from the first worksheet of a spreadsheet

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::{AgentRoster, RosterError, agents_from_rows};
use crate::queue::RosterSnapshot;
use crate::sheets::SheetsClient;

pub struct SheetsRoster {
    client: Arc<SheetsClient>,
    range: String,
}

impl SheetsRoster {
    /// `range` without a sheet name addresses the first worksheet
    pub fn new(client: Arc<SheetsClient>, range: impl Into<String>) -> Self {
        Self {
            client,
            range: range.into(),
        }
    }
}

#[async_trait]
impl AgentRoster for SheetsRoster {
    async fn list_agents(&self) -> Result<RosterSnapshot, RosterError> {
        let rows = self.client.get_values(&self.range).await?;
        debug!("Fetched {} roster rows (including header)", rows.len());

        let agents = agents_from_rows(&rows)?;
        info!(
            "Loaded {} agents from spreadsheet {}",
            agents.len(),
            self.client.spreadsheet_id()
        );
        Ok(RosterSnapshot::new(agents))
    }
}

/// Stand-in used when the spreadsheet is not configured; every fetch fails
pub struct UnconfiguredRoster;

#[async_trait]
impl AgentRoster for UnconfiguredRoster {
    async fn list_agents(&self) -> Result<RosterSnapshot, RosterError> {
        Err(RosterError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

// src/sheets/position.rs
// Queue pointer persisted in a two-cell worksheet (label in A1, value in A2)

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use super::{SheetsClient, SheetsError};
use crate::queue::{DurableTier, StoreError};

pub const POSITION_LABEL: &str = "queue_position";
const SHEET_ROWS: u32 = 10;
const SHEET_COLUMNS: u32 = 2;

pub struct SheetsPositionTier {
    client: Arc<SheetsClient>,
    sheet: String,
    ready: AtomicBool,
}

impl SheetsPositionTier {
    pub fn new(client: Arc<SheetsClient>, sheet: impl Into<String>) -> Self {
        Self {
            client,
            sheet: sheet.into(),
            ready: AtomicBool::new(false),
        }
    }

    fn value_cell(&self) -> String {
        format!("{}!A2", self.sheet)
    }

    /// Creates the side-table with its label the first time it is needed
    async fn ensure_sheet(&self) -> Result<(), SheetsError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let titles = self.client.sheet_titles().await?;
        if !titles.iter().any(|t| t == &self.sheet) {
            info!("Worksheet '{}' not found, creating it", self.sheet);
            match self
                .client
                .add_sheet(&self.sheet, SHEET_ROWS, SHEET_COLUMNS)
                .await
            {
                Ok(()) => {
                    self.client
                        .update_values(
                            &format!("{}!A1", self.sheet),
                            vec![vec![POSITION_LABEL.to_string()]],
                        )
                        .await?;
                }
                // Another request created it between the check and the add
                Err(e) if is_already_exists(&e) => {
                    info!("Worksheet '{}' was created concurrently", self.sheet);
                }
                Err(e) => return Err(e),
            }
        }

        self.ready.store(true, Ordering::Release);
        Ok(())
    }
}

fn is_already_exists(err: &SheetsError) -> bool {
    matches!(err, SheetsError::Api { status: 400, message } if message.contains("already exists"))
}

/// Parses the stored cell; anything that is not a non-negative integer is absent
pub fn parse_position(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}

impl From<SheetsError> for StoreError {
    fn from(e: SheetsError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl DurableTier for SheetsPositionTier {
    async fn read(&self) -> Result<Option<usize>, StoreError> {
        self.ensure_sheet().await?;

        let rows = self.client.get_values(&self.value_cell()).await?;
        let raw = rows
            .first()
            .and_then(|row| row.first())
            .map(String::as_str)
            .unwrap_or("");

        let position = parse_position(raw);
        if position.is_none() && !raw.trim().is_empty() {
            warn!("Unparsable queue position '{}' in {}", raw, self.value_cell());
        }
        Ok(position)
    }

    async fn write(&self, position: usize) -> Result<(), StoreError> {
        self.ensure_sheet().await?;
        self.client
            .update_values(&self.value_cell(), vec![vec![position.to_string()]])
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Google Sheets"
    }
}

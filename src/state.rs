// src/state.rs
// Shared application state and collaborator wiring

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::QueueConfig,
    notify::{EvolutionNotifier, NotificationDispatcher, UniformDelay},
    queue::{DurableTier, PositionStore, QueueRotator},
    roster::{AgentRoster, SheetsRoster, UnconfiguredRoster},
    sheets::{SheetsClient, SheetsPositionTier},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<QueueConfig>,
    pub rotator: Arc<QueueRotator>,
    /// `None` when the messaging gateway is not configured
    pub dispatcher: Option<Arc<NotificationDispatcher>>,
}

impl AppState {
    pub fn new(
        config: Arc<QueueConfig>,
        rotator: Arc<QueueRotator>,
        dispatcher: Option<Arc<NotificationDispatcher>>,
    ) -> Self {
        Self {
            config,
            rotator,
            dispatcher,
        }
    }

    /// Builds real collaborators from configuration. Anything unconfigured
    /// degrades: no roster (requests fail), in-memory pointer only, or no
    /// notifications.
    pub fn from_config(config: QueueConfig) -> anyhow::Result<Self> {
        let (roster, durable) = build_sheets(&config);
        let store = Arc::new(PositionStore::new(durable));
        let rotator = Arc::new(QueueRotator::new(roster, store));
        let dispatcher = build_dispatcher(&config)?;

        Ok(Self::new(Arc::new(config), rotator, dispatcher))
    }
}

fn build_sheets(config: &QueueConfig) -> (Arc<dyn AgentRoster>, Option<Arc<dyn DurableTier>>) {
    if !config.is_sheets_configured() {
        warn!("Google Sheets not configured, roster unavailable and position kept in memory");
        return (Arc::new(UnconfiguredRoster), None);
    }

    match SheetsClient::new(
        config.spreadsheet_id.clone(),
        &config.google_credentials_json,
        config.sheets_api_base.clone(),
        config.http_timeout(),
    ) {
        Ok(client) => {
            let client = Arc::new(client);
            info!(
                "Google Sheets configured for spreadsheet {} (position sheet '{}')",
                config.spreadsheet_id, config.position_sheet
            );
            let roster: Arc<dyn AgentRoster> =
                Arc::new(SheetsRoster::new(client.clone(), config.roster_range.clone()));
            let durable: Arc<dyn DurableTier> =
                Arc::new(SheetsPositionTier::new(client, config.position_sheet.clone()));
            (roster, Some(durable))
        }
        Err(e) => {
            warn!("Failed to initialise Google Sheets client: {}", e);
            let roster: Arc<dyn AgentRoster> = Arc::new(UnconfiguredRoster);
            (roster, None)
        }
    }
}

fn build_dispatcher(config: &QueueConfig) -> anyhow::Result<Option<Arc<NotificationDispatcher>>> {
    if !config.is_notifier_configured() {
        warn!("Evolution API not configured, notifications disabled");
        return Ok(None);
    }

    let notifier = EvolutionNotifier::new(
        config.evolution_api_url.clone(),
        config.evolution_api_key.clone(),
        config.notify_send_timeout(),
    )?;
    let delay = UniformDelay::from_secs(config.notify_min_delay_secs, config.notify_max_delay_secs);

    Ok(Some(Arc::new(NotificationDispatcher::new(
        Arc::new(notifier),
        Arc::new(delay),
        config.notify_send_timeout(),
        config.notify_signature.clone(),
    ))))
}

// src/main.rs

use clap::Parser;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use agent_queue::api::http_router;
use agent_queue::config::CONFIG;
use agent_queue::state::AppState;

/// Round-robin agent queue service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Bind host (overrides QUEUE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides QUEUE_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// trace, debug, info, warn or error (overrides QUEUE_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = CONFIG.clone();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting agent queue v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Google Sheets: {}",
        if config.is_sheets_configured() { "configured" } else { "not configured" }
    );
    info!(
        "Notifications: {}",
        if config.is_notifier_configured() { "enabled" } else { "disabled" }
    );

    let bind_address = config.bind_address();
    let app_state = Arc::new(AppState::from_config(config)?);
    let app = http_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("HTTP server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

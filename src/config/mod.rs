// src/config/mod.rs
// Service configuration loaded from .env and the environment

use once_cell::sync::Lazy;
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

use crate::sheets::client::DEFAULT_API_BASE;

// Values shipped in deployment templates; treated as unset
const PLACEHOLDER_SHEET_ID: &str = "placeholder_sheet_id";
const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "{}",
    r#"{"type":"service_account","project_id":"placeholder"}"#,
];
const PLACEHOLDER_EVOLUTION_URL: &str = "https://placeholder-api.com/api";
const PLACEHOLDER_EVOLUTION_KEY: &str = "placeholder_key";

#[derive(Debug, Clone)]
pub struct QueueConfig {
    // ── Server Configuration
    pub host: String,
    pub port: u16,
    pub log_level: String,

    // ── Google Sheets (roster + durable position)
    pub spreadsheet_id: String,
    pub google_credentials_json: String,
    pub sheets_api_base: String,
    pub roster_range: String,
    pub position_sheet: String,

    // ── Evolution API (WhatsApp)
    pub evolution_api_url: String,
    pub evolution_api_key: String,

    // ── Notification pacing
    pub notify_min_delay_secs: f64,
    pub notify_max_delay_secs: f64,
    pub notify_send_timeout_secs: u64,
    pub notify_total_timeout_secs: u64,
    pub notify_signature: String,

    // ── Timeouts (in seconds)
    pub http_timeout_secs: u64,
}

/// Which collaborators are usable, as reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub spreadsheet_id: bool,
    pub google_credentials: bool,
    pub evolution_api_url: bool,
    pub evolution_api_key: bool,
    pub google_sheets_configured: bool,
    pub notifications_configured: bool,
}

/// Parses `key` from `lookup`, ignoring trailing `# comments` and whitespace.
/// Missing or unparsable values fall back to `default`.
fn env_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        None => default,
    }
}

/// Like `env_var_or` for free-form strings (JSON, URLs, keys); `#` is kept.
fn env_string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

impl QueueConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = &lookup;
        Self {
            host: env_var_or(lookup, "QUEUE_HOST", "0.0.0.0".to_string()),
            port: env_var_or(lookup, "QUEUE_PORT", 8000),
            log_level: env_var_or(lookup, "QUEUE_LOG_LEVEL", "info".to_string()),
            spreadsheet_id: env_string_or(lookup, "SPREADSHEET_ID", ""),
            google_credentials_json: env_string_or(lookup, "GOOGLE_CREDENTIALS_JSON", "{}"),
            sheets_api_base: env_string_or(lookup, "SHEETS_API_BASE", DEFAULT_API_BASE),
            roster_range: env_string_or(lookup, "ROSTER_RANGE", "A:C"),
            position_sheet: env_string_or(lookup, "POSITION_SHEET", "Config"),
            evolution_api_url: env_string_or(lookup, "EVOLUTION_API_URL", ""),
            evolution_api_key: env_string_or(lookup, "EVOLUTION_API_KEY", ""),
            notify_min_delay_secs: env_var_or(lookup, "NOTIFY_MIN_DELAY_SECS", 3.0),
            notify_max_delay_secs: env_var_or(lookup, "NOTIFY_MAX_DELAY_SECS", 8.0),
            notify_send_timeout_secs: env_var_or(lookup, "NOTIFY_SEND_TIMEOUT_SECS", 30),
            notify_total_timeout_secs: env_var_or(lookup, "NOTIFY_TOTAL_TIMEOUT_SECS", 600),
            notify_signature: env_string_or(lookup, "NOTIFY_SIGNATURE", "Service Team"),
            http_timeout_secs: env_var_or(lookup, "HTTP_TIMEOUT_SECS", 30),
        }
    }

    // --- Convenience Methods ---

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_spreadsheet_id(&self) -> bool {
        !self.spreadsheet_id.is_empty() && self.spreadsheet_id != PLACEHOLDER_SHEET_ID
    }

    pub fn has_google_credentials(&self) -> bool {
        let raw = self.google_credentials_json.as_str();
        !raw.is_empty() && !PLACEHOLDER_CREDENTIALS.contains(&raw)
    }

    pub fn is_sheets_configured(&self) -> bool {
        self.has_spreadsheet_id() && self.has_google_credentials()
    }

    pub fn has_evolution_url(&self) -> bool {
        !self.evolution_api_url.is_empty() && self.evolution_api_url != PLACEHOLDER_EVOLUTION_URL
    }

    pub fn has_evolution_key(&self) -> bool {
        !self.evolution_api_key.is_empty() && self.evolution_api_key != PLACEHOLDER_EVOLUTION_KEY
    }

    pub fn is_notifier_configured(&self) -> bool {
        self.has_evolution_url() && self.has_evolution_key()
    }

    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            spreadsheet_id: self.has_spreadsheet_id(),
            google_credentials: self.has_google_credentials(),
            evolution_api_url: self.has_evolution_url(),
            evolution_api_key: self.has_evolution_key(),
            google_sheets_configured: self.is_sheets_configured(),
            notifications_configured: self.is_notifier_configured(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn notify_send_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_send_timeout_secs)
    }

    pub fn notify_total_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_total_timeout_secs)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<QueueConfig> = Lazy::new(QueueConfig::from_env);

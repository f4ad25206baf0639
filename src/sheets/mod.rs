// src/sheets/mod.rs
// Google Sheets access: service-account auth, values API, pointer side-table

pub mod auth;
pub mod client;
pub mod position;

pub use auth::{ServiceAccountAuth, ServiceAccountKey};
pub use client::SheetsClient;
pub use position::SheetsPositionTier;

/// Error types for Google Sheets calls
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },
}

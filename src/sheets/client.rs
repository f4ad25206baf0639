// src/sheets/client.rs
// Minimal Google Sheets v4 values client

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{ServiceAccountAuth, ServiceAccountKey, SheetsError};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

pub struct SheetsClient {
    http: Client,
    api_base: String,
    spreadsheet_id: String,
    auth: ServiceAccountAuth,
}

impl SheetsClient {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        credentials_json: &str,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SheetsError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agent-queue/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let key = ServiceAccountKey::from_json(credentials_json)?;
        let auth = ServiceAccountAuth::new(key, http.clone())?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            auth,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Authorized request builder relative to this spreadsheet
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SheetsError> {
        let token = self.auth.access_token().await?;
        let url = format!(
            "{}/v4/spreadsheets/{}{}",
            self.api_base.trim_end_matches('/'),
            self.spreadsheet_id,
            path
        );
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// Reads a range as rows of display strings
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        debug!("Reading range '{}' from spreadsheet {}", range, self.spreadsheet_id);

        let response = self
            .request(Method::GET, &format!("/values/{}", urlencoding::encode(range)))
            .await?
            .query(&[("majorDimension", "ROWS"), ("valueRenderOption", "FORMATTED_VALUE")])
            .send()
            .await?;

        let range: ValueRange = check(response).await?.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    /// Overwrites a range with raw (unparsed) values
    pub async fn update_values(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SheetsError> {
        debug!("Writing range '{}' in spreadsheet {}", range, self.spreadsheet_id);

        let response = self
            .request(Method::PUT, &format!("/values/{}", urlencoding::encode(range)))
            .await?
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    pub async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let response = self
            .request(Method::GET, "")
            .await?
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;

        let meta: SpreadsheetMeta = check(response).await?.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    pub async fn add_sheet(&self, title: &str, rows: u32, columns: u32) -> Result<(), SheetsError> {
        debug!("Adding worksheet '{}' to spreadsheet {}", title, self.spreadsheet_id);

        let response = self
            .request(Method::POST, ":batchUpdate")
            .await?
            .json(&json!({
                "requests": [{
                    "addSheet": {
                        "properties": {
                            "title": title,
                            "gridProperties": { "rowCount": rows, "columnCount": columns }
                        }
                    }
                }]
            }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

/// Turns non-2xx responses into `SheetsError::Api`, preferring Google's
/// error message over the raw body.
async fn check(response: Response) -> Result<Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

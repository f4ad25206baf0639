// src/notify/evolution.rs
// WhatsApp delivery through an Evolution API instance

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{NotifyError, Notifier};
use crate::queue::Agent;

pub struct EvolutionNotifier {
    client: Client,
    url: String,
    api_key: String,
}

impl EvolutionNotifier {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

#[async_trait]
impl Notifier for EvolutionNotifier {
    async fn send(&self, agent: &Agent, message: &str) -> Result<u16, NotifyError> {
        debug!("POST {} for {}", self.url, agent.name);

        let response = self
            .client
            .post(&self.url)
            .header("apikey", &self.api_key)
            .json(&json!({
                "number": agent.phone,
                "text": message,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if is_accepted(status) {
            Ok(status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

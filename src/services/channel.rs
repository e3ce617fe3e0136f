//! WhatsApp messaging channel client
//!
//! This service talks to the WhatsApp HTTP gateway that holds the connected
//! session: connection status checks and text message delivery to a group's
//! bound chat identifier. Transport failures and a disconnected session both
//! surface as `Channel` errors, which the dispatch pipeline converts into
//! ERROR log entries instead of aborting the batch.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use crate::config::settings::WhatsAppConfig;
use crate::utils::errors::{ZapOfertasError, Result};

/// Connection state reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelStatus {
    Connected,
    Disconnected,
    QrPending,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusResponse {
    status: ChannelStatus,
}

#[derive(Debug, Clone, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SendMessageResponse {
    sent: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the WhatsApp session gateway
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppChannel {
    /// Create a new WhatsAppChannel instance
    pub fn new(config: WhatsAppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ZapOfertas/1.0")
            .build()
            .map_err(ZapOfertasError::Http)?;

        Ok(Self { client, config })
    }

    /// Query the gateway session status
    pub async fn status(&self) -> Result<ChannelStatus> {
        let url = format!("{}/api/status", self.config.api_url.trim_end_matches('/'));

        let response = self.client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| ZapOfertasError::Channel(format!("status check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ZapOfertasError::Channel(
                format!("status check returned {}", response.status())
            ));
        }

        let body: StatusResponse = response.json().await
            .map_err(|e| ZapOfertasError::Channel(format!("invalid status response: {}", e)))?;

        debug!(status = ?body.status, "Channel status");
        Ok(body.status)
    }

    /// Send a text message to a chat
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/api/send-message", self.config.api_url.trim_end_matches('/'));

        let response = self.client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&SendMessageRequest { chat_id, message: text })
            .send()
            .await
            .map_err(|e| ZapOfertasError::Channel(format!("send failed: {}", e)))?;

        if !response.status().is_success() {
            error!(chat_id = chat_id, status = %response.status(), "Gateway rejected message");
            return Err(ZapOfertasError::Channel(
                format!("send returned {}", response.status())
            ));
        }

        let body: SendMessageResponse = response.json().await
            .map_err(|e| ZapOfertasError::Channel(format!("invalid send response: {}", e)))?;

        if !body.sent {
            return Err(ZapOfertasError::Channel(
                body.error.unwrap_or_else(|| "gateway reported message not sent".to_string())
            ));
        }

        debug!(chat_id = chat_id, "Message sent");
        Ok(())
    }
}

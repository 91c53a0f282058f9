// src/notify/webhook.rs
use super::{Delivery, Notifier};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook answered HTTP {0}")]
    Status(StatusCode),
}

/// Posts `{"content": "<message>"}` to a chat-style webhook.
///
/// One attempt per message; no retries, no queue.
pub struct WebhookNotifier {
    url: Option<Url>,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: Option<Url>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self { url, client })
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    async fn deliver(&self, url: &Url, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url.clone())
            .json(&json!({ "content": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Delivery {
        let Some(url) = &self.url else {
            error!(%message, "No webhook URL configured, alert not delivered");
            return Delivery::Disabled;
        };

        match self.deliver(url, message).await {
            Ok(()) => {
                debug!(%message, "Alert delivered to webhook");
                Delivery::Delivered
            }
            Err(e) => {
                error!(error = %e, %message, "Failed to deliver alert to webhook");
                Delivery::Failed
            }
        }
    }
}

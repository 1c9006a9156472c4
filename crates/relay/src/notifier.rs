use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::{error::RelayError, message::NotificationPayload};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError>;
}

/// Webhook target resolved once at startup. A bad value fails requests, not the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEndpoint {
    Ready(Url),
    Missing,
    Malformed(String),
}

impl WebhookEndpoint {
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return WebhookEndpoint::Missing;
        };
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
                WebhookEndpoint::Ready(url)
            }
            _ => WebhookEndpoint::Malformed(raw.to_string()),
        }
    }

    pub fn url(&self) -> Result<&Url, RelayError> {
        match self {
            WebhookEndpoint::Ready(url) => Ok(url),
            WebhookEndpoint::Missing => Err(RelayError::MissingWebhookUrl),
            WebhookEndpoint::Malformed(_) => Err(RelayError::MalformedWebhookUrl),
        }
    }
}

pub struct WebhookNotifier {
    http: Client,
    endpoint: WebhookEndpoint,
}

impl WebhookNotifier {
    pub fn new(endpoint: WebhookEndpoint, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        match &endpoint {
            WebhookEndpoint::Ready(url) => {
                info!(host = url.host_str().unwrap_or_default(), "webhook endpoint configured");
            }
            WebhookEndpoint::Missing => {
                warn!("webhook url is not set; contact submissions will fail until it is");
            }
            WebhookEndpoint::Malformed(_) => {
                warn!("webhook url could not be parsed; contact submissions will fail");
            }
        }
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &WebhookEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError> {
        let url = self.endpoint.url()?;
        let response = self
            .http
            .post(url.clone())
            .json(&payload.to_webhook_message())
            .send()
            .await
            .map_err(|source| {
                warn!(
                    host = url.host_str().unwrap_or_default(),
                    timeout = source.is_timeout(),
                    "webhook request did not complete"
                );
                RelayError::network(source)
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Delivery {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;

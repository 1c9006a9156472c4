use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{error::FailureReason, protocol::ContactSubmission, protocol::CONTACT_ROUTE};
use thiserror::Error;

pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to reach relay: {0}")]
    Network(#[source] reqwest::Error),
    #[error("relay responded with status {status}")]
    Rejected { status: u16 },
}

impl TransportError {
    pub fn reason(&self) -> FailureReason {
        match self {
            TransportError::Network(_) => FailureReason::Network,
            TransportError::Rejected { .. } => FailureReason::Server,
        }
    }
}

#[async_trait]
pub trait ContactTransport: Send + Sync {
    /// Resolves once the relay has answered. Any 2xx counts as accepted.
    async fn post_submission(&self, submission: &ContactSubmission) -> Result<(), TransportError>;
}

pub struct HttpContactTransport {
    http: Client,
    endpoint: String,
}

impl HttpContactTransport {
    pub fn new(relay_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}{CONTACT_ROUTE}", relay_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContactTransport for HttpContactTransport {
    async fn post_submission(&self, submission: &ContactSubmission) -> Result<(), TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(TransportError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

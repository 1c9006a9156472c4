use axum::{extract::rejection::BytesRejection, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("webhook url is not configured")]
    MissingWebhookUrl,
    #[error("webhook url is malformed")]
    MalformedWebhookUrl,
    #[error("could not read request body: {0}")]
    UnreadableBody(#[source] BytesRejection),
    #[error("invalid contact payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// Built from a `reqwest::Error` stripped of its url; the path carries the webhook secret.
    #[error("failed to reach webhook: {0}")]
    Network(#[source] reqwest::Error),
    #[error("webhook responded with status {status}")]
    Delivery { status: u16 },
}

impl RelayError {
    pub fn network(source: reqwest::Error) -> Self {
        RelayError::Network(source.without_url())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingWebhookUrl
            | RelayError::MalformedWebhookUrl
            | RelayError::InvalidPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UnreadableBody(rejection) => rejection.status(),
            RelayError::Network(_) | RelayError::Delivery { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Diagnostic label; delivery and network failures look the same to the form.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingWebhookUrl | RelayError::MalformedWebhookUrl => "configuration",
            RelayError::UnreadableBody(_) => "unreadable_body",
            RelayError::InvalidPayload(_) => "invalid_payload",
            RelayError::Network(_) => "network",
            RelayError::Delivery { .. } => "delivery",
        }
    }
}

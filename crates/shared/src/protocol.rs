use serde::{Deserialize, Serialize};

pub const CONTACT_ROUTE: &str = "/contact";
/// Older deployments posted to the pages-style API path.
pub const LEGACY_CONTACT_ROUTE: &str = "/api/contact";
pub const HEALTH_ROUTE: &str = "/healthz";

/// Body the contact form posts to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub budget: String,
    pub message: String,
    #[serde(default)]
    pub privacy: bool,
}

/// Relay acknowledgment returned to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayAck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayAck {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Outbound webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub text: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;

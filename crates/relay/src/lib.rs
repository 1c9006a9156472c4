use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::protocol::{
    ContactSubmission, RelayAck, CONTACT_ROUTE, HEALTH_ROUTE, LEGACY_CONTACT_ROUTE,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub mod error;
pub mod message;
pub mod notifier;

pub use error::RelayError;
pub use message::NotificationPayload;
pub use notifier::{Notifier, WebhookEndpoint, WebhookNotifier};

const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct RelayState {
    pub notifier: Arc<dyn Notifier>,
}

impl RelayState {
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self {
            notifier: Arc::new(notifier),
        }
    }
}

/// Contact routes only accept POST; other methods get an empty 405 before any body is read.
/// Oversized bodies surface as a body rejection inside `handle` so the reply stays JSON.
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route(CONTACT_ROUTE, post(handle))
        .route(LEGACY_CONTACT_ROUTE, post(handle))
        .route(HEALTH_ROUTE, get(healthz))
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

pub async fn handle(
    State(state): State<RelayState>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<RelayAck>) {
    let submission_id = Uuid::new_v4();
    let span = info_span!("contact_submission", %submission_id);
    let result = match body {
        Ok(body) => relay(&state, &body).instrument(span).await,
        Err(rejection) => Err(RelayError::UnreadableBody(rejection)),
    };
    match result {
        Ok(()) => (StatusCode::OK, Json(RelayAck::success())),
        Err(err) => {
            error!(%submission_id, kind = err.kind(), error = %err, "contact submission failed");
            (err.status_code(), Json(RelayAck::failure(err.to_string())))
        }
    }
}

/// Parse, format, deliver. One attempt, no retries.
pub async fn relay(state: &RelayState, body: &[u8]) -> Result<(), RelayError> {
    let submission: ContactSubmission = serde_json::from_slice(body)?;
    let payload = NotificationPayload::from_submission(&submission);
    state.notifier.deliver(&payload).await?;
    info!(
        has_company = !submission.company.trim().is_empty(),
        has_budget = !submission.budget.trim().is_empty(),
        "contact submission relayed"
    );
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

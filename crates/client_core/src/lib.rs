use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::{
    contact::{ContactDraft, FieldKey, FieldValue},
    error::{FailureReason, RETRY_LATER_MESSAGE},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod transport;

pub use transport::{ContactTransport, HttpContactTransport, TransportError};

/// Confirmation panel text shown once the relay has accepted a submission.
pub const SUCCESS_MESSAGE: &str =
    "送信が完了しました\nお問い合わせいただき、ありがとうございます。内容を確認の上、2営業日以内にご連絡いたします。";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionOutcome {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn is_sending(&self) -> bool {
        matches!(self, SubmissionOutcome::Sending)
    }

    /// Inline error text for the form, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// One request went to the relay.
    Sent,
    /// Validation failed locally; nothing was sent.
    Rejected,
    /// A submission was already in flight.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub draft: ContactDraft,
    pub outcome: SubmissionOutcome,
}

impl FormSnapshot {
    pub fn inputs_disabled(&self) -> bool {
        self.outcome.is_sending()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    OutcomeChanged(SubmissionOutcome),
}

#[derive(Default)]
struct FormState {
    draft: ContactDraft,
    outcome: SubmissionOutcome,
}

pub struct ContactForm<T: ContactTransport> {
    transport: T,
    /// Never held across an await, so `InFlight::drop` can always take it.
    inner: Mutex<FormState>,
    events: broadcast::Sender<FormEvent>,
}

impl<T: ContactTransport> ContactForm<T> {
    pub fn new(transport: T) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            inner: Mutex::new(FormState::default()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock_state();
        FormSnapshot {
            draft: state.draft.clone(),
            outcome: state.outcome.clone(),
        }
    }

    pub fn draft(&self) -> ContactDraft {
        self.lock_state().draft.clone()
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        self.lock_state().outcome.clone()
    }

    pub fn inputs_disabled(&self) -> bool {
        self.lock_state().outcome.is_sending()
    }

    /// Inputs are disabled while a submission is in flight, so edits are dropped then.
    pub fn update_field(&self, key: FieldKey, value: impl Into<FieldValue>) {
        let mut state = self.lock_state();
        if state.outcome.is_sending() {
            debug!(?key, "ignoring field update while sending");
            return;
        }
        state.draft.apply(key, value.into());
    }

    pub async fn submit(&self) -> SubmitDisposition {
        let submission = {
            let mut state = self.lock_state();
            if state.outcome.is_sending() {
                debug!("submission already in flight");
                return SubmitDisposition::Ignored;
            }
            if let Err(err) = state.draft.validate() {
                self.set_outcome(
                    &mut state,
                    SubmissionOutcome::Failed {
                        reason: FailureReason::Validation,
                        message: err.to_string(),
                    },
                );
                return SubmitDisposition::Rejected;
            }
            self.set_outcome(&mut state, SubmissionOutcome::Sending);
            state.draft.to_submission()
        };

        let in_flight = InFlight { form: self };
        let result = self.transport.post_submission(&submission).await;
        in_flight.settle(result);
        SubmitDisposition::Sent
    }

    fn finish(&self, result: Result<(), TransportError>) {
        let mut state = self.lock_state();
        match result {
            Ok(()) => {
                info!("contact submission accepted");
                state.draft = ContactDraft::default();
                self.set_outcome(&mut state, SubmissionOutcome::Succeeded);
            }
            Err(err) => {
                warn!(reason = ?err.reason(), error = %err, "contact submission failed");
                self.fail_retry_later(&mut state, err.reason());
            }
        }
    }

    fn fail_retry_later(&self, state: &mut FormState, reason: FailureReason) {
        self.set_outcome(
            state,
            SubmissionOutcome::Failed {
                reason,
                message: RETRY_LATER_MESSAGE.to_string(),
            },
        );
    }

    fn set_outcome(&self, state: &mut FormState, outcome: SubmissionOutcome) {
        state.outcome = outcome.clone();
        let _ = self.events.send(FormEvent::OutcomeChanged(outcome));
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Moves the form out of `Sending` if the submit future is dropped before the relay answers.
struct InFlight<'a, T: ContactTransport> {
    form: &'a ContactForm<T>,
}

impl<T: ContactTransport> InFlight<'_, T> {
    fn settle(self, result: Result<(), TransportError>) {
        self.form.finish(result);
        std::mem::forget(self);
    }
}

impl<T: ContactTransport> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let mut state = self.form.lock_state();
        if state.outcome.is_sending() {
            warn!("contact submission abandoned before the relay answered");
            self.form.fail_retry_later(&mut state, FailureReason::Network);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

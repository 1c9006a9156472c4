use shared::protocol::{ContactSubmission, WebhookMessage};

/// Flat text notification derived from one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub text: String,
}

impl NotificationPayload {
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        let mut text = format!(
            "*お問い合わせ*\n*氏名:* {}\n*メール:* {}\n*会社名:* {}\n",
            submission.name, submission.email, submission.company
        );
        let budget = submission.budget.trim();
        if !budget.is_empty() {
            text.push_str(&format!("*ご予算:* {budget}\n"));
        }
        text.push_str(&format!("*内容:*\n{}", submission.message));
        Self { text }
    }

    pub fn to_webhook_message(&self) -> WebhookMessage {
        WebhookMessage {
            text: self.text.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/message_tests.rs"]
mod tests;

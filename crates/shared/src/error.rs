use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown inline whenever the relay could not be reached or refused the submission.
pub const RETRY_LATER_MESSAGE: &str = "送信に失敗しました。しばらくしてから再度お試しください。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Validation,
    Network,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("プライバシーポリシーに同意してください。")]
    ConsentRequired,
    #[error("お名前を入力してください。")]
    MissingName,
    #[error("有効なメールアドレスを入力してください。")]
    InvalidEmail,
    #[error("お問い合わせ内容を入力してください。")]
    MissingMessage,
}

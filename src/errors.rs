use thiserror::Error;

use crate::core::models::MessageId;

/// Failures reported by the summarization and translation collaborators.
///
/// These carry diagnostic detail for the logs. They never reach the user
/// directly; the session collapses them into a [`SessionError`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service is unavailable in this environment")]
    Unavailable,

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Service returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse service response: {0}")]
    Parse(String),

    #[error("Service call panicked: {0}")]
    Panicked(String),

    #[error("Input too large for the service (~{estimated_tokens} tokens)")]
    InputTooLarge { estimated_tokens: usize },
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ServiceError::Parse(error.to_string())
        } else {
            ServiceError::Http(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Parse(error.to_string())
    }
}

/// Errors surfaced by the message session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Summarization failed")]
    SummarizationFailed,

    #[error("Translation failed.")]
    TranslationFailed,

    #[error("No message with id {0}")]
    MessageNotFound(MessageId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

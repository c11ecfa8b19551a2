//! Summarization capability

pub mod client;
pub mod prompt_builder;

use async_trait::async_trait;

use crate::errors::ServiceError;

// Re-export main types for convenience
pub use client::{LlmClient, estimate_tokens};

/// Something that can condense a piece of text into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the capability does not exist
    /// in the current environment, or any other variant when it fails.
    async fn summarize(&self, text: &str) -> Result<String, ServiceError>;
}

/// Summarizer used when no summarization backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl Summarizer for Unavailable {
    async fn summarize(&self, _text: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Unavailable)
    }
}

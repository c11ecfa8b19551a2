//! Translation service

pub mod client;

use async_trait::async_trait;

use crate::core::language::Language;
use crate::errors::ServiceError;

pub use client::HttpTranslator;

#[async_trait]
pub trait Translator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached, answers with a
    /// non-success status, or returns a body without a translation.
    async fn translate(
        &self,
        source: Language,
        target: Language,
        text: &str,
    ) -> Result<String, ServiceError>;
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::Translator;
use crate::core::config::AppConfig;
use crate::core::language::Language;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    translation: String,
}

/// Client for a Lingva-style REST endpoint:
/// `GET {base}/{source}/{target}/{text}` answering `{"translation": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    http: Client,
    base_url: String,
}

impl HttpTranslator {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS, timeouts).
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.translate_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ServiceError::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config.translate_base_url.as_str(), http))
    }

    #[must_use]
    pub fn request_url(&self, source: Language, target: Language, text: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            source.code(),
            target.code(),
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        source: Language,
        target: Language,
        text: &str,
    ) -> Result<String, ServiceError> {
        let url = self.request_url(source, target, text);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: TranslationResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_text_and_codes() {
        let t = HttpTranslator::new("https://lingva.example/api/v1/");
        assert_eq!(
            t.request_url(Language::English, Language::Spanish, "Hello world/?&"),
            "https://lingva.example/api/v1/en/es/Hello%20world%2F%3F%26"
        );
    }

    #[test]
    fn from_config_uses_configured_base() {
        let config = AppConfig {
            translate_base_url: "http://localhost:3000/api".to_string(),
            ..AppConfig::default()
        };
        let t = HttpTranslator::from_config(&config).unwrap();
        assert_eq!(
            t.request_url(Language::English, Language::French, "hi"),
            "http://localhost:3000/api/en/fr/hi"
        );
    }
}

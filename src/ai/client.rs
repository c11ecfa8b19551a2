//! LLM (`OpenAI`) API client module
//!
//! Backs the summarization capability with the `OpenAI` Responses API.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use super::Summarizer;
use super::prompt_builder::build_summary_prompt;
use crate::core::config::AppConfig;
use crate::errors::ServiceError;

pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

const MAX_CONTEXT_TOKENS: usize = 400_000;
const MAX_OUTPUT_TOKENS: usize = 4_000;
const TOKEN_BUFFER: usize = 250;
const MIN_OUTPUT_TOKENS: usize = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    endpoint: String,
}

impl LlmClient {
    #[must_use]
    pub fn new(api_key: String, org_id: Option<String>, model_name: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            api_key,
            org_id,
            model_name,
            endpoint: OPENAI_RESPONSES_URL.to_string(),
        }
    }

    /// Returns `None` when no API key is configured, meaning summarization is
    /// unavailable in this environment.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config.openai_api_key.as_ref().map(|key| {
            Self::new(
                key.clone(),
                config.openai_org_id.clone(),
                config.openai_model.clone(),
            )
        })
    }

    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Point the client at a different Responses-compatible endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| ServiceError::Http(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            let org_value = HeaderValue::from_str(org).map_err(|e| {
                ServiceError::Http(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }
        Ok(headers)
    }

    /// # Errors
    ///
    /// Returns an error if the prompt does not fit the context window, the
    /// HTTP request fails, or the response carries no output text.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, ServiceError> {
        #[cfg(feature = "debug-logs")]
        info!("Using summary prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
            .sum::<usize>();

        let max_output_tokens = MAX_CONTEXT_TOKENS
            .saturating_sub(estimated_input_tokens)
            .saturating_sub(TOKEN_BUFFER)
            .min(MAX_OUTPUT_TOKENS);

        info!(
            "Generating summary: ~{} input tokens, max {} output tokens",
            estimated_input_tokens, max_output_tokens
        );

        if max_output_tokens < MIN_OUTPUT_TOKENS {
            return Err(ServiceError::InputTooLarge {
                estimated_tokens: estimated_input_tokens,
            });
        }

        let request_body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&prompt),
            "max_output_tokens": max_output_tokens
        });

        debug!("POST {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ServiceError::Http(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse OpenAI response: {e}")))?;

        extract_output_text(&response_json)
            .ok_or_else(|| ServiceError::Parse("No text in response".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        self.generate_summary(build_summary_prompt(text)).await
    }
}

/// Pull the output text out of a Responses API body, preferring the
/// aggregated `output_text` field over walking `output[].content[]`.
pub(crate) fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut collected: Vec<String> = Vec::new();
    if let Some(items) = response_json.get("output").and_then(Value::as_array) {
        for item in items {
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for p in parts {
                let is_output_text = p
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t == "output_text");
                if !is_output_text {
                    continue;
                }
                if let Some(s) = p.get("text").and_then(Value::as_str) {
                    collected.push(s.to_string());
                } else if let Some(s) = p
                    .get("text")
                    .and_then(|t| t.get("value"))
                    .and_then(Value::as_str)
                {
                    collected.push(s.to_string());
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

/// Build Responses API input payload from a chat-style prompt.
/// Assistant turns are dropped since the Responses API treats them as output.
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter(|m| !matches!(m.role, MessageRole::assistant))
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                _ => "user",
            };

            let mut parts: Vec<Value> = Vec::new();
            match &m.content {
                Content::Text(t) => {
                    parts.push(json!({
                        "type": "input_text",
                        "text": t
                    }));
                }
                Content::ImageUrl(imgs) => {
                    for img in imgs {
                        if let Some(ref iu) = img.image_url {
                            parts.push(json!({
                                "type": "input_image",
                                "image_url": iu.url
                            }));
                        }
                    }
                }
            }

            json!({
                "role": role_str,
                "content": parts
            })
        })
        .collect()
}

use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_TRANSLATE_URL: &str = "https://lingva.ml/api/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub translate_base_url: String,
    pub translate_timeout: Option<Duration>,
    pub openai_api_key: Option<String>,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            translate_base_url: DEFAULT_TRANSLATE_URL.to_string(),
            translate_timeout: None,
            openai_api_key: None,
            openai_org_id: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns an error if `LINGO_TRANSLATE_URL` is not an absolute http(s)
    /// URL or `LINGO_TRANSLATE_TIMEOUT_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let translate_base_url = match get("LINGO_TRANSLATE_URL") {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_TRANSLATE_URL.to_string(),
        };

        let translate_timeout = get("LINGO_TRANSLATE_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self {
            translate_base_url,
            translate_timeout,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        name: "LINGO_TRANSLATE_URL",
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name: "LINGO_TRANSLATE_URL",
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name: "LINGO_TRANSLATE_TIMEOUT_SECS",
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}

use crate::error::{ReviewError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const TEMPERATURE_ENV: &str = "TEMPERATURE";
pub const MAX_TOKENS_ENV: &str = "MAX_TOKENS";
pub const REQUEST_TIMEOUT_ENV: &str = "CODEQA_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Settings for the external model, resolved once at startup and handed to
/// the client by value.
#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    /// `None` means a model call may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.1,
            max_output_tokens: 2000,
            top_p: 0.95,
            top_k: 40,
            request_timeout: None,
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an injected variable lookup. The API key is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ReviewError::MissingApiKey)?;

        Self::new(api_key).with_overrides_from(lookup)
    }

    /// Apply the optional variables (model, sampling, timeout) on top of `self`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(model) = get(MODEL_ENV) {
            self.model = model;
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(raw) = get(TEMPERATURE_ENV) {
            self.temperature = parse_var(TEMPERATURE_ENV, &raw)?;
        }
        if let Some(raw) = get(MAX_TOKENS_ENV) {
            self.max_output_tokens = parse_var(MAX_TOKENS_ENV, &raw)?;
        }
        if let Some(raw) = get(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = parse_var(REQUEST_TIMEOUT_ENV, &raw)?;
            self.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ReviewError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ReviewError::invalid_config("model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ReviewError::invalid_config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(ReviewError::invalid_config("max_output_tokens must be > 0"));
        }
        Ok(())
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ReviewError::invalid_config(format!("{name}={raw:?}: {e}")))
}

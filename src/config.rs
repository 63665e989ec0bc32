use std::fmt;
use std::time::Duration;

use crate::error::{QuoteError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Clone)]
pub struct ExtractorConfig {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
    relay_url: Option<String>,
    temperature: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            relay_url: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("relay_url", &self.relay_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ExtractorConfig {
    /// Direct LLM configuration with default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Load from `.env` and the process environment.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `QUOTE_MODEL`,
    /// `QUOTE_RELAY_URL` and `QUOTE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        config.api_key = non_empty("OPENAI_API_KEY");
        if let Some(base_url) = non_empty("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = non_empty("QUOTE_MODEL") {
            config.model = model;
        }
        config.relay_url = non_empty("QUOTE_RELAY_URL");
        if let Some(raw) = non_empty("QUOTE_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                QuoteError::Config(format!(
                    "QUOTE_TIMEOUT_SECS must be a whole number of seconds, got `{raw}`"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_relay_url(mut self, relay_url: impl Into<String>) -> Self {
        self.relay_url = Some(relay_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn relay_url(&self) -> Option<&str> {
        self.relay_url.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// A relay needs no key; a direct LLM call does.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(QuoteError::Config("timeout must be greater than zero".to_string()));
        }
        if self.relay_url.is_none() && self.api_key.is_none() {
            return Err(QuoteError::Config(
                "OPENAI_API_KEY is required unless QUOTE_RELAY_URL is set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ExtractorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(180));
        assert!(config.validate().is_err());
    }

    #[test]
    fn reads_environment_values() {
        let config = ExtractorConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("QUOTE_MODEL", "gpt-4o"),
            ("QUOTE_TIMEOUT_SECS", "30"),
            ("QUOTE_RELAY_URL", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.relay_url(), None);
        assert!(config.validate().is_ok());
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn relay_does_not_need_a_key() {
        let config = ExtractorConfig::default().with_relay_url("http://localhost/api/analyze");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = ExtractorConfig::from_lookup(lookup(&[("QUOTE_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}

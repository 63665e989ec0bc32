use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::adapters::{AdaptedContent, InputAdapter};
use crate::config::ExtractorConfig;
use crate::core::normalize;
use crate::error::{QuoteError, Result};
use crate::schemas::log_schema_diagnostics;
use crate::services::json_recovery::parse_recovered;
use crate::services::llm_client::{
    first_message_content, map_transport_error, ChatCompletionRequest, LlmClient,
};
use crate::services::prompt::{IMAGE_PROMPT, PAGES_PROMPT, SYSTEM_INSTRUCTION};
use crate::types::TravelQuoteData;

/// Anything that turns adapted content into raw model text.
#[async_trait]
pub trait ExtractionService: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Raw response text, expected (not guaranteed) to contain a quote JSON object.
    async fn extract(&self, content: &AdaptedContent) -> Result<String>;
}

/// Calls a chat-completions endpoint directly.
#[derive(Debug, Clone)]
pub struct ChatExtractor {
    client: LlmClient,
    model: String,
    temperature: f32,
}

impl ChatExtractor {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: crate::config::DEFAULT_TEMPERATURE,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self::new(LlmClient::from_config(config)?, config.model())
            .with_temperature(config.temperature()))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Chat messages for one document.
    pub fn build_messages(content: &AdaptedContent) -> Vec<Value> {
        let user = match content {
            AdaptedContent::Text(text) => json!({ "role": "user", "content": text }),
            AdaptedContent::Image(image) => json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": IMAGE_PROMPT },
                    image_part(&image.data_url()),
                ]
            }),
            AdaptedContent::Images(images) => {
                let mut parts = vec![json!({ "type": "text", "text": PAGES_PROMPT })];
                parts.extend(images.iter().map(|image| image_part(&image.data_url())));
                json!({ "role": "user", "content": parts })
            }
        };

        vec![
            json!({ "role": "system", "content": SYSTEM_INSTRUCTION }),
            user,
        ]
    }
}

fn image_part(url: &str) -> Value {
    json!({
        "type": "image_url",
        "image_url": { "url": url, "detail": "high" }
    })
}

#[async_trait]
impl ExtractionService for ChatExtractor {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn extract(&self, content: &AdaptedContent) -> Result<String> {
        let body = ChatCompletionRequest::new(&self.model, Self::build_messages(content))
            .with_temperature(self.temperature)
            .with_json_object_response()
            .into_value();

        let response = self.client.chat_completion(&body).await?;
        first_message_content(&response)
    }
}

/// Posts `{content}` to a relay endpoint that answers `{result}` or `{error}`.
#[derive(Debug, Clone)]
pub struct RelayExtractor {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RelayExtractor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| QuoteError::Config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn request_body(content: &AdaptedContent) -> Value {
        json!({ "content": content.to_relay_content() })
    }
}

#[async_trait]
impl ExtractionService for RelayExtractor {
    fn name(&self) -> &'static str {
        "relay"
    }

    async fn extract(&self, content: &AdaptedContent) -> Result<String> {
        debug!(target: "travel_quote::http", url = %self.url, kind = content.kind(), "posting to relay");
        let response = self
            .http
            .post(&self.url)
            .json(&Self::request_body(content))
            .send()
            .await
            .map_err(|err| map_transport_error(err, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| map_transport_error(err, self.timeout))?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|body| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Server Error: {}", status.as_u16()));
            return Err(QuoteError::Service {
                status: status.as_u16(),
                message,
            });
        }

        body.as_ref()
            .and_then(|body| body.get("result"))
            .and_then(Value::as_str)
            .filter(|result| !result.trim().is_empty())
            .map(str::to_string)
            .ok_or(QuoteError::EmptyResponse)
    }
}

fn quote_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Q[A-Z0-9]{8,}")
            .unwrap_or_else(|err| panic!("invalid quote code pattern: {err}"))
    })
}

fn is_ascii_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// First token shaped like a quote code ("QJ0060322200") standing on ASCII
/// word boundaries.
pub fn find_quote_code(text: &str) -> Option<&str> {
    quote_code_pattern().find_iter(text).find_map(|m| {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        let bounded = !before.is_some_and(is_ascii_word) && !after.is_some_and(is_ascii_word);
        bounded.then(|| m.as_str())
    })
}

/// Fill a missing or `NULL` quote code from the source text.
pub fn apply_quote_code_fallback(payload: &mut Value, source_text: &str) -> bool {
    let Some(root) = payload.as_object_mut() else {
        return false;
    };
    let current = root
        .get("quote_info")
        .and_then(|info| info.get("code"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if !current.is_empty() && current != "NULL" {
        return false;
    }
    let Some(code) = find_quote_code(source_text) else {
        return false;
    };

    let info = root
        .entry("quote_info")
        .or_insert_with(|| json!({}));
    if !info.is_object() {
        *info = json!({});
    }
    info["code"] = Value::String(code.to_string());
    info!(target: "travel_quote::extract", code, "quote code recovered from source text");
    true
}

/// Adapter + extraction service + recovery + normalization.
#[derive(Debug, Clone)]
pub struct QuoteExtractor {
    adapter: InputAdapter,
    service: Arc<dyn ExtractionService>,
}

impl QuoteExtractor {
    pub fn new(adapter: InputAdapter, service: Arc<dyn ExtractionService>) -> Self {
        Self { adapter, service }
    }

    /// Relay when `relay_url` is configured, direct chat otherwise.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let service: Arc<dyn ExtractionService> = match config.relay_url() {
            Some(url) => Arc::new(RelayExtractor::new(url, config.timeout())?),
            None => Arc::new(ChatExtractor::from_config(config)?),
        };
        Ok(Self::new(InputAdapter::default(), service))
    }

    pub fn with_adapter(mut self, adapter: InputAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn service_name(&self) -> &'static str {
        self.service.name()
    }

    /// Adapt a file and extract a normalized quote from it.
    pub async fn extract_path(&self, path: &Path) -> Result<TravelQuoteData> {
        let content = self.adapter.adapt_path(path).await?;
        self.extract_content(&content).await
    }

    pub async fn extract_content(&self, content: &AdaptedContent) -> Result<TravelQuoteData> {
        let payload = self.extract_payload(content).await?;
        Ok(normalize(&payload))
    }

    /// The recovered, pre-normalization payload.
    pub async fn extract_payload(&self, content: &AdaptedContent) -> Result<Value> {
        info!(
            target: "travel_quote::extract",
            service = self.service.name(),
            kind = content.kind(),
            "requesting extraction"
        );
        let raw = self.service.extract(content).await.map_err(|err| {
            warn!(target: "travel_quote::extract", code = err.error_code(), "extraction service failed: {err}");
            err
        })?;

        let mut payload = parse_recovered(&raw)?;
        if let Some(text) = content.as_text() {
            apply_quote_code_fallback(&mut payload, text);
        }
        log_schema_diagnostics(&payload);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ImagePayload;

    #[test]
    fn finds_quote_codes_on_ascii_boundaries() {
        assert_eq!(
            find_quote_code("■ 견적번호 : QJ0060322200 입니다"),
            Some("QJ0060322200")
        );
        assert_eq!(find_quote_code("견적번호QA12345678"), Some("QA12345678"));
        assert_eq!(find_quote_code("XQA12345678 QB1234567"), None);
        assert_eq!(find_quote_code("QA12345678x"), None);
        assert_eq!(find_quote_code("no code"), None);
    }

    #[test]
    fn fallback_only_fills_missing_codes() {
        let mut payload = json!({ "quote_info": { "code": "NULL" } });
        assert!(apply_quote_code_fallback(&mut payload, "Ref QJ0060322200"));
        assert_eq!(payload["quote_info"]["code"], "QJ0060322200");

        let mut payload = json!({ "quote_info": { "code": "Q-KEEP" } });
        assert!(!apply_quote_code_fallback(&mut payload, "QJ0060322200"));

        let mut payload = json!({});
        assert!(apply_quote_code_fallback(&mut payload, "QJ0060322200"));
        assert_eq!(payload["quote_info"]["code"], "QJ0060322200");

        let mut payload = json!([]);
        assert!(!apply_quote_code_fallback(&mut payload, "QJ0060322200"));
    }

    #[test]
    fn image_messages_use_data_urls() {
        let content = AdaptedContent::Image(ImagePayload::encode(b"img", "image/png"));
        let messages = ChatExtractor::build_messages(&content);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"][0]["text"], IMAGE_PROMPT);
        assert_eq!(
            messages[1]["content"][1]["image_url"],
            json!({ "url": "data:image/png;base64,aW1n", "detail": "high" })
        );
    }

    #[test]
    fn relay_body_wraps_content() {
        let body = RelayExtractor::request_body(&AdaptedContent::Text("hello".to_string()));
        assert_eq!(body, json!({ "content": { "text": "hello" } }));
        let pages = AdaptedContent::Images(vec![ImagePayload::encode(b"a", "image/png")]);
        assert_eq!(
            RelayExtractor::request_body(&pages),
            json!({ "content": { "images": [{ "data": "YQ==", "mimeType": "image/png" }] } })
        );
    }
}

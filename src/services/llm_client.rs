use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::{QuoteError, Result};

/// Failures surface on the first attempt unless retries are opted into.
const DEFAULT_MAX_RETRIES: usize = 0;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct LlmClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
    max_retries: usize,
    initial_backoff: Duration,
}

impl LlmClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| QuoteError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http,
            timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: INITIAL_BACKOFF,
        })
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| QuoteError::Config("OPENAI_API_KEY is not set".to_string()))?;
        Self::new(api_key, config.base_url(), config.timeout())
    }

    /// Retry 429 and 5xx responses up to `max_retries` times. Off by default.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a chat-completions body, retrying 429 and 5xx responses.
    pub async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let request_url = build_chat_url(&self.base_url);
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;

        loop {
            debug!(target: "travel_quote::http", url = %request_url, attempt, "sending chat completion");

            let response = self
                .http
                .post(&request_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
                .map_err(|err| map_transport_error(err, self.timeout))?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response
                .text()
                .await
                .map_err(|err| map_transport_error(err, self.timeout))?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff)
                    .min(MAX_RETRY_AFTER);

                if attempt < self.max_retries {
                    warn!(target: "travel_quote::http", attempt, "rate limited, retrying in {:?}", retry_after_duration);
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(QuoteError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                warn!(target: "travel_quote::http", attempt, status = status.as_u16(), "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let response_json: Option<Value> = serde_json::from_str(&response_text).ok();

            if !status.is_success() {
                let api_message = response_json
                    .as_ref()
                    .and_then(api_error_message)
                    .unwrap_or_else(|| response_text.clone());

                return Err(QuoteError::Service {
                    status: status.as_u16(),
                    message: api_message,
                });
            }

            let response_json = response_json.ok_or_else(|| QuoteError::Service {
                status: status.as_u16(),
                message: "response body is not JSON".to_string(),
            })?;

            if let Some(message) = api_error_message(&response_json) {
                return Err(QuoteError::Service {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response_json);
        }
    }
}

fn api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

pub(crate) fn map_transport_error(err: reqwest::Error, timeout: Duration) -> QuoteError {
    if err.is_timeout() {
        QuoteError::Timeout(format!("no response within {}s", timeout.as_secs()))
    } else {
        QuoteError::Http(err.to_string())
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

/// Text content of the first choice, or [`QuoteError::EmptyResponse`].
pub fn first_message_content(response: &Value) -> Result<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
        .ok_or(QuoteError::EmptyResponse)
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask for a bare JSON object response.
    pub fn with_json_object_response(mut self) -> Self {
        self.response_format = Some(json!({ "type": "json_object" }));
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_appended_once() {
        assert_eq!(
            build_chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:8080/chat/completions"),
            "http://localhost:8080/chat/completions"
        );
    }

    #[test]
    fn request_body_includes_optional_fields() {
        let messages = vec![json!({"role": "user", "content": "hi"})];
        let body = ChatCompletionRequest::new("gpt-4.1-mini", messages)
            .with_temperature(0.5)
            .with_json_object_response()
            .into_value();
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["temperature"], json!(0.5));
        assert_eq!(body["response_format"], json!({ "type": "json_object" }));
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn empty_content_is_empty_response() {
        let response = json!({ "choices": [{ "message": { "content": "  " } }] });
        assert!(matches!(first_message_content(&response), Err(QuoteError::EmptyResponse)));
        assert!(matches!(first_message_content(&json!({})), Err(QuoteError::EmptyResponse)));
        let response = json!({ "choices": [{ "message": { "content": "{\"a\":1}" } }] });
        assert_eq!(first_message_content(&response).unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn server_errors_fail_on_first_attempt_by_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("busy")
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new("sk-test", server.url(), Duration::from_secs(5)).unwrap();
        let err = client.chat_completion(&json!({"model": "m"})).await.unwrap_err();
        assert!(matches!(err, QuoteError::Service { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_fails_on_first_attempt_by_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "7")
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new("sk-test", server.url(), Duration::from_secs(5)).unwrap();
        let err = client.chat_completion(&json!({})).await.unwrap_err();
        assert!(matches!(err, QuoteError::RateLimit { retry_after: 7 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn opted_in_server_errors_are_retried_before_failing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("busy")
            .expect(2)
            .create_async()
            .await;

        let client = LlmClient::new("sk-test", server.url(), Duration::from_secs(5))
            .unwrap()
            .with_max_retries(1)
            .with_initial_backoff(Duration::from_millis(1));
        let err = client.chat_completion(&json!({"model": "m"})).await.unwrap_err();
        match err {
            QuoteError::Service { status, ref message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "busy");
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn opted_in_rate_limit_surfaces_after_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "0")
            .with_body(r#"{"error":{"message":"slow down"}}"#)
            .expect(2)
            .create_async()
            .await;

        let client = LlmClient::new("sk-test", server.url(), Duration::from_secs(5))
            .unwrap()
            .with_max_retries(1);
        let err = client.chat_completion(&json!({})).await.unwrap_err();
        assert!(matches!(err, QuoteError::RateLimit { retry_after: 1 }));
        assert_eq!(err.user_message(), "API 사용량 초과 (429). 잠시 후 시도하세요.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_errors_carry_api_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key"}}"#)
            .create_async()
            .await;

        let client = LlmClient::new("sk-test", server.url(), Duration::from_secs(5)).unwrap();
        let err = client.chat_completion(&json!({})).await.unwrap_err();
        match err {
            QuoteError::Service { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }
}

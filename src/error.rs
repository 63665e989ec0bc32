use thiserror::Error;

/// Main error type for quote extraction and editing
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read `{file}`: {message}")]
    InputAdapter { file: String, message: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Extraction service error {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Extraction service returned an empty response")]
    EmptyResponse,

    #[error("Extraction response is not valid JSON: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("Invalid quote record at {path}: {message}")]
    InvalidRecord { path: String, message: String },

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, QuoteError>;

impl QuoteError {
    pub fn input(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputAdapter {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn invalid_edit(message: impl Into<String>) -> Self {
        Self::InvalidEdit(message.into())
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            QuoteError::Service { status, .. } => *status >= 500,
            QuoteError::RateLimit { .. } => true,
            QuoteError::Timeout(_) => true,
            QuoteError::Http(_) => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::Config(_) => "CONFIG_ERROR",
            QuoteError::InputAdapter { .. } => "INPUT_ADAPTER_ERROR",
            QuoteError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            QuoteError::Http(_) => "HTTP_ERROR",
            QuoteError::Service { .. } => "SERVICE_ERROR",
            QuoteError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            QuoteError::Timeout(_) => "TIMEOUT_ERROR",
            QuoteError::EmptyResponse => "EMPTY_RESPONSE",
            QuoteError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            QuoteError::InvalidRecord { .. } => "INVALID_RECORD",
            QuoteError::InvalidEdit(_) => "INVALID_EDIT",
            QuoteError::Io(_) => "IO_ERROR",
            QuoteError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Localized message shown to the operator at the point of the failed action
    pub fn user_message(&self) -> String {
        match self {
            QuoteError::Config(message) => format!("설정 오류: {message}"),
            QuoteError::InputAdapter { message, .. } => {
                format!("파일 처리 중 오류 발생: {message}")
            }
            QuoteError::UnsupportedFormat(name) => {
                format!("지원하지 않는 파일 형식입니다: {name}")
            }
            QuoteError::Http(_) => {
                "네트워크 연결 오류입니다. 연결 상태를 확인한 후 다시 시도해주세요.".to_string()
            }
            QuoteError::Service { status: 429, .. } | QuoteError::RateLimit { .. } => {
                "API 사용량 초과 (429). 잠시 후 시도하세요.".to_string()
            }
            QuoteError::Service { status: 400, .. } => {
                "요청 형식이 잘못되었습니다 (400).".to_string()
            }
            QuoteError::Service { status: 504, .. } | QuoteError::Timeout(_) => {
                "AI 응답 시간 초과. 데이터가 너무 많거나 처리가 지연되고 있습니다. 다시 시도해주세요."
                    .to_string()
            }
            QuoteError::Service { status, message } => {
                format!("서버 오류 ({status}): {message}")
            }
            QuoteError::EmptyResponse => "AI가 빈 응답을 반환했습니다.".to_string(),
            QuoteError::MalformedResponse { .. } => {
                "데이터 변환 실패 (JSON 형식이 아님).".to_string()
            }
            QuoteError::InvalidRecord { path, .. } => {
                format!("견적 데이터 형식이 올바르지 않습니다 ({path}).")
            }
            QuoteError::InvalidEdit(message) => format!("편집할 수 없습니다: {message}"),
            QuoteError::Io(err) => format!("파일 읽기 실패: {err}"),
            QuoteError::Serialization(_) => "데이터 직렬화에 실패했습니다.".to_string(),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}

pub mod extraction;
pub mod json_recovery;
pub mod llm_client;
pub mod prompt;

pub use extraction::{
    apply_quote_code_fallback, find_quote_code, ChatExtractor, ExtractionService, QuoteExtractor,
    RelayExtractor,
};
pub use json_recovery::{parse_recovered, recover_json};
pub use llm_client::{ChatCompletionRequest, LlmClient};

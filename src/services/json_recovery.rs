use serde_json::Value;
use tracing::{debug, error};

use crate::error::{QuoteError, Result};

/// Return the span from the first `{` to the last `}`.
///
/// The match is greedy and does not check brace balance, so trailing prose
/// between two objects is kept. Without a `{...}` pair the trimmed input is
/// returned; empty input yields `"{}"`.
pub fn recover_json(text: &str) -> String {
    if text.is_empty() {
        return "{}".to_string();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text[start..=end].to_string(),
        _ => text.trim().to_string(),
    }
}

/// Recover and parse a model response into an untrusted JSON value.
///
/// A payload that still fails to parse is logged in full and surfaced as
/// [`QuoteError::MalformedResponse`].
pub fn parse_recovered(text: &str) -> Result<Value> {
    let recovered = recover_json(text);
    debug!(
        target: "travel_quote::extract",
        raw_len = text.len(),
        recovered_len = recovered.len(),
        "recovered JSON candidate from model output"
    );

    serde_json::from_str(&recovered).map_err(|err| {
        error!(
            target: "travel_quote::extract",
            raw = %recovered,
            "JSON parse failed: {err}"
        );
        QuoteError::MalformedResponse {
            reason: err.to_string(),
            raw: recovered,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prose_around_object() {
        assert_eq!(
            recover_json("Here is the data: {\"a\":1} Thanks!"),
            "{\"a\":1}"
        );
    }

    #[test]
    fn strips_code_fences() {
        let fenced = "```json\n{\"quote_info\": {\"code\": \"Q1\"}}\n```";
        assert_eq!(recover_json(fenced), "{\"quote_info\": {\"code\": \"Q1\"}}");
    }

    #[test]
    fn returns_trimmed_input_without_braces() {
        assert_eq!(recover_json("  no json here \n"), "no json here");
        assert_eq!(recover_json("} backwards {"), "} backwards {");
    }

    #[test]
    fn greedy_span_swallows_text_between_objects() {
        assert_eq!(recover_json("{\"a\":1} and {\"b\":2}"), "{\"a\":1} and {\"b\":2}");
    }

    #[test]
    fn empty_input_is_empty_object() {
        assert_eq!(recover_json(""), "{}");
        assert_eq!(parse_recovered("").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn unparseable_payload_is_malformed_response() {
        let err = parse_recovered("{\"a\": 1,,}").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESPONSE");
        assert!(matches!(
            err,
            QuoteError::MalformedResponse { ref raw, .. } if raw == "{\"a\": 1,,}"
        ));
    }
}

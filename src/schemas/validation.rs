use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{QuoteError, Result};
use crate::schemas::{quote_schema, SchemaHandle};
use crate::types::TravelQuoteData;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Check a payload against a schema, returning at most a few readable issues.
pub fn schema_issues(schema: &SchemaHandle, payload: &Value) -> Vec<String> {
    let validator = match JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
    {
        Ok(validator) => validator,
        Err(err) => {
            return vec![format!(
                "failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            )]
        }
    };

    let Err(errors) = validator.validate(payload) else {
        return Vec::new();
    };

    let mut details = Vec::new();
    for (idx, error) in errors.enumerate() {
        if idx == MAX_SCHEMA_ERRORS {
            details.push("additional errors truncated".to_string());
            break;
        }
        let mut path = error.instance_path.to_string();
        if path.is_empty() {
            path = "<root>".to_string();
        }
        details.push(format!("{}: {}", path, error));
    }
    details
}

/// Log how far a raw extraction payload is from the canonical shape.
///
/// Purely diagnostic: normalization repairs whatever is reported here.
pub fn log_schema_diagnostics(payload: &Value) -> usize {
    let schema = quote_schema();
    let issues = schema_issues(schema, payload);
    if issues.is_empty() {
        debug!(
            target: "travel_quote::extract",
            schema = schema.schema_name(),
            "payload matches schema"
        );
    } else {
        warn!(
            target: "travel_quote::extract",
            schema = schema.schema_name(),
            issues = %issues.join("; "),
            "payload deviates from schema; normalizing"
        );
    }
    issues.len()
}

/// Strictly parse a saved canonical record, reporting the failing path.
pub fn parse_record(raw: &str) -> Result<TravelQuoteData> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        QuoteError::InvalidRecord {
            path: location,
            message: err.into_inner().to_string(),
        }
    })
}

use schemars::schema::RootSchema;
use serde_json::Value;
use std::sync::OnceLock;

use crate::types::TravelQuoteData;

/// Cached JSON schema together with the name used in diagnostics.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Value,
}

impl SchemaHandle {
    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        let schema_json = serde_json::to_value(root).unwrap_or_else(|err| {
            panic!("failed to serialize schema for {}: {}", schema_name, err)
        });

        Self {
            schema_name,
            schema_json,
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        &self.schema_json
    }
}

/// Schema of the canonical quote record.
pub fn quote_schema() -> &'static SchemaHandle {
    static SCHEMA: OnceLock<SchemaHandle> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaHandle::from_root_schema(
            "TravelQuoteData",
            schemars::schema_for!(TravelQuoteData),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_uses_wire_field_names() {
        let schema = quote_schema().schema_json();
        let required = schema["required"].as_array().unwrap();
        for field in ["quote_info", "trip_summary", "cost", "itinerary"] {
            assert!(required.iter().any(|value| value == field), "{field}");
        }
        let cost = &schema["definitions"]["Cost"]["properties"];
        assert!(cost.get("exchangeRates").is_some());
        let categories = schema["definitions"]["CostCategory"].to_string();
        assert!(categories.contains("항공"));
    }
}

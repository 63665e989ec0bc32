pub mod schema;
pub mod validation;

pub use schema::{quote_schema, SchemaHandle};
pub use validation::{log_schema_diagnostics, parse_record, schema_issues};

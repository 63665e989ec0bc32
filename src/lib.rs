//! travel-quote-rs: turn loosely structured travel-agency documents into
//! editable, printable travel quotes.
//!
//! A source document (spreadsheet, PDF, image or plain text) is adapted into
//! model input, sent to an extraction service, recovered and normalized into a
//! [`TravelQuoteData`] record. Records are edited through [`QuoteStore`] and
//! rendered to a standalone HTML page with [`render_quote_html`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use travel_quote_rs::{render_quote_html, ExtractorConfig, QuoteExtractor, QuoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractorConfig::from_env()?;
//!     let extractor = QuoteExtractor::from_config(&config)?;
//!
//!     let mut store = QuoteStore::new();
//!     let extracted = extractor
//!         .extract_path(std::path::Path::new("quote.xlsx"))
//!         .await;
//!     let record = store.accept_extraction(extracted)?;
//!
//!     println!("{}", render_quote_html(&record, true));
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod render;
pub mod schemas;
pub mod services;
pub mod types;

pub use adapters::{AdaptedContent, InputAdapter};
pub use config::ExtractorConfig;
pub use crate::core::{
    apply_edit, normalize, CostSummary, CurrencyTotals, Period, QuoteEdit, QuoteStore,
};
pub use error::{QuoteError, Result};
pub use render::{export_file_name, render_quote_html};
pub use schemas::{parse_record, quote_schema};
pub use services::{recover_json, ExtractionService, QuoteExtractor};
pub use types::{
    Cost, CostCategory, CostDetail, ItineraryItem, Meals, QuoteInfo, TravelQuoteData, TripSummary,
};

#[cfg(feature = "cli")]
pub mod cli;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::costing::CostSummary;
use crate::core::edits::{apply_edit, QuoteEdit};
use crate::error::{QuoteError, Result};
use crate::types::TravelQuoteData;

/// Holds the current record and applies edits one at a time.
///
/// Readers get `Arc` snapshots; an edit swaps in a new snapshot and never
/// touches one already handed out.
#[derive(Debug, Default, Clone)]
pub struct QuoteStore {
    current: Option<Arc<TravelQuoteData>>,
    revision: u64,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TravelQuoteData) -> Self {
        let mut store = Self::new();
        store.replace(record);
        store
    }

    /// Current snapshot, if a record has been loaded.
    pub fn snapshot(&self) -> Option<Arc<TravelQuoteData>> {
        self.current.clone()
    }

    /// Incremented every time the record changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Replace the record wholesale (e.g. after loading a saved quote).
    pub fn replace(&mut self, record: TravelQuoteData) -> Arc<TravelQuoteData> {
        let snapshot = Arc::new(record);
        self.current = Some(Arc::clone(&snapshot));
        self.revision += 1;
        debug!(target: "travel_quote::store", revision = self.revision, "record replaced");
        snapshot
    }

    /// Install the outcome of an extraction.
    ///
    /// A failed extraction is passed back to the caller and the current
    /// record stays as it was.
    pub fn accept_extraction(
        &mut self,
        outcome: Result<TravelQuoteData>,
    ) -> Result<Arc<TravelQuoteData>> {
        match outcome {
            Ok(record) => {
                info!(
                    target: "travel_quote::store",
                    code = %record.quote_info.code,
                    details = record.cost.details.len(),
                    days = record.itinerary.len(),
                    "extraction accepted"
                );
                Ok(self.replace(record))
            }
            Err(err) => {
                warn!(
                    target: "travel_quote::store",
                    code = err.error_code(),
                    kept_existing = self.current.is_some(),
                    "extraction failed: {err}"
                );
                Err(err)
            }
        }
    }

    /// Apply one edit and publish the resulting snapshot.
    pub fn apply(&mut self, edit: QuoteEdit) -> Result<Arc<TravelQuoteData>> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| QuoteError::invalid_edit("no quote is loaded"))?;

        let name = edit.name();
        let next = apply_edit(current, edit).map_err(|err| {
            debug!(target: "travel_quote::store", edit = name, "edit rejected: {err}");
            err
        })?;

        let snapshot = Arc::new(next);
        self.current = Some(Arc::clone(&snapshot));
        self.revision += 1;
        debug!(
            target: "travel_quote::store",
            edit = name,
            revision = self.revision,
            "edit applied"
        );
        Ok(snapshot)
    }

    /// Derived cost figures for the current snapshot.
    pub fn summary(&self) -> Option<CostSummary> {
        self.current.as_deref().map(CostSummary::compute)
    }
}

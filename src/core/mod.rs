pub mod costing;
pub mod edits;
pub mod normalize;
pub mod period;
pub mod store;

pub use costing::{CategorySummary, CostSummary, CurrencyTotals, TotalField};
pub use edits::{
    apply_edit, DayChange, DetailChange, ListKind, QuoteEdit, QuoteInfoField, TagKind, TripField,
};
pub use normalize::normalize;
pub use period::Period;
pub use store::QuoteStore;

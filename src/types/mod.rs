pub mod quote;

pub use quote::{
    Cost, CostCategory, CostDetail, ItineraryItem, Meals, QuoteInfo, TravelQuoteData,
    TripSummary,
};

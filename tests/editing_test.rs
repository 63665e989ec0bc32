use std::sync::Arc;

use serde_json::json;
use travel_quote_rs::{
    apply_edit, normalize,
    core::{DayChange, DetailChange, ListKind},
    CostCategory, ItineraryItem, QuoteEdit, QuoteError, QuoteStore, TravelQuoteData,
};

fn four_day_record() -> TravelQuoteData {
    let mut record = TravelQuoteData::default();
    record.trip_summary.period_text = "3박 4일".to_string();
    record.itinerary = (1..=4)
        .map(|day| ItineraryItem {
            day,
            location: format!("city-{day}"),
            ..ItineraryItem::blank(day)
        })
        .collect();
    record
}

#[test]
fn removing_a_day_renumbers_the_rest_in_order() {
    let record = four_day_record();
    let next = apply_edit(&record, QuoteEdit::RemoveDay { index: 1 }).unwrap();

    let days: Vec<u32> = next.itinerary.iter().map(|d| d.day).collect();
    let locations: Vec<&str> = next.itinerary.iter().map(|d| d.location.as_str()).collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(locations, vec!["city-1", "city-3", "city-4"]);
    assert_eq!(next.trip_summary.period_text, "2박 3일");

    // input snapshot is untouched
    assert_eq!(record.itinerary.len(), 4);
}

#[test]
fn adding_a_day_keeps_the_period_gap() {
    let mut record = four_day_record();
    record.trip_summary.period_text = "2박 4일".to_string();
    let next = apply_edit(&record, QuoteEdit::AddDay).unwrap();
    assert_eq!(next.itinerary.last().map(|d| d.day), Some(5));
    assert_eq!(next.itinerary[4].activities, vec![String::new()]);
    assert_eq!(next.trip_summary.period_text, "3박 5일");
}

#[test]
fn adding_a_day_repairs_extracted_numbering() {
    let missing = normalize(&json!({
        "itinerary": [{ "location": "A" }, { "location": "B" }]
    }));
    let next = apply_edit(&missing, QuoteEdit::AddDay).unwrap();
    let days: Vec<u32> = next.itinerary.iter().map(|d| d.day).collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(next.itinerary[1].location, "B");

    let duplicated = normalize(&json!({
        "itinerary": [{ "day": 2, "location": "A" }, { "day": 2, "location": "B" }, { "day": 7 }]
    }));
    let next = apply_edit(&duplicated, QuoteEdit::AddDay).unwrap();
    let days: Vec<u32> = next.itinerary.iter().map(|d| d.day).collect();
    assert_eq!(days, vec![1, 2, 3, 4]);
    assert_eq!(next.itinerary[0].location, "A");
}

#[test]
fn moving_a_day_renumbers() {
    let next = apply_edit(&four_day_record(), QuoteEdit::MoveDay { from: 3, to: 0 }).unwrap();
    assert_eq!(next.itinerary[0].location, "city-4");
    assert_eq!(next.itinerary[0].day, 1);
    assert_eq!(next.itinerary[3].day, 4);
}

#[test]
fn quantity_edits_recompute_amount() {
    let record = TravelQuoteData::default();
    let record = apply_edit(
        &record,
        QuoteEdit::AddCostDetail { category: CostCategory::Hotel },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::UpdateCostDetail { index: 0, change: DetailChange::UnitPrice(120.0) },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::UpdateCostDetail { index: 0, change: DetailChange::Quantity(8.0) },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::UpdateCostDetail { index: 0, change: DetailChange::Frequency(2.0) },
    )
    .unwrap();
    assert_eq!(record.cost.details[0].amount, 1920.0);

    // a direct amount override keeps the existing unit price
    let record = apply_edit(
        &record,
        QuoteEdit::UpdateCostDetail { index: 0, change: DetailChange::Amount(2000.0) },
    )
    .unwrap();
    assert_eq!(record.cost.details[0].amount, 2000.0);
    assert_eq!(record.cost.details[0].unit_price, 120.0);
}

#[test]
fn new_lines_inherit_foreign_currency_from_their_category() {
    let record = TravelQuoteData::default();
    let record = apply_edit(
        &record,
        QuoteEdit::AddCostDetail { category: CostCategory::Hotel },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::UpdateCostDetail { index: 0, change: DetailChange::Currency("USD".to_string()) },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::AddCostDetail { category: CostCategory::Hotel },
    )
    .unwrap();
    let record = apply_edit(
        &record,
        QuoteEdit::AddCostDetail { category: CostCategory::Meal },
    )
    .unwrap();

    assert_eq!(record.cost.details[1].currency, "USD");
    assert_eq!(record.cost.details[2].currency, "");
}

#[test]
fn foreign_currency_set_follows_currency_edits() {
    let mut store = QuoteStore::with_record(TravelQuoteData::default());
    store
        .apply(QuoteEdit::AddCostDetail { category: CostCategory::Sightseeing })
        .unwrap();
    assert!(store.summary().unwrap().foreign_currencies.is_empty());

    store
        .apply(QuoteEdit::UpdateCostDetail {
            index: 0,
            change: DetailChange::Currency("THB".to_string()),
        })
        .unwrap();
    let summary = store.summary().unwrap();
    assert_eq!(summary.foreign_currencies, vec!["THB"]);
    assert!(summary.has_foreign_currency());

    store
        .apply(QuoteEdit::UpdateCostDetail {
            index: 0,
            change: DetailChange::Currency("원".to_string()),
        })
        .unwrap();
    assert!(store.summary().unwrap().foreign_currencies.is_empty());
}

#[test]
fn out_of_range_edits_are_rejected() {
    let record = four_day_record();
    let err = apply_edit(&record, QuoteEdit::RemoveDay { index: 9 }).unwrap_err();
    assert!(matches!(err, QuoteError::InvalidEdit(_)));

    let err = apply_edit(
        &record,
        QuoteEdit::SetListItem { list: ListKind::Inclusions, index: 0, value: "x".to_string() },
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_EDIT");

    let err = apply_edit(
        &record,
        QuoteEdit::SetExchangeRate { currency: "usd".to_string(), rate: f64::NAN },
    )
    .unwrap_err();
    assert!(matches!(err, QuoteError::InvalidEdit(_)));
}

#[test]
fn store_publishes_new_snapshots() {
    let mut store = QuoteStore::new();
    assert!(store.apply(QuoteEdit::AddDay).is_err());

    let first = store.replace(four_day_record());
    let second = store
        .apply(QuoteEdit::UpdateDay { index: 0, change: DayChange::Hotel("힐튼".to_string()) })
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.itinerary[0].hotel, "");
    assert_eq!(second.itinerary[0].hotel, "힐튼");
    assert_eq!(store.revision(), 2);
}

#[test]
fn failed_extraction_keeps_the_edited_record() {
    let mut store = QuoteStore::with_record(four_day_record());
    store
        .apply(QuoteEdit::SetExchangeRate { currency: "usd".to_string(), rate: 1350.0 })
        .unwrap();
    let before = store.snapshot().unwrap();

    let outcome = store.accept_extraction(Err(QuoteError::Timeout("180s".to_string())));
    assert!(matches!(outcome, Err(QuoteError::Timeout(_))));

    let after = store.snapshot().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.cost.exchange_rates.get("USD"), Some(&1350.0));
}

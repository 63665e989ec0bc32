//! Converts untrusted extraction output into a canonical [`TravelQuoteData`].
//!
//! This is the only place a loosely typed [`serde_json::Value`] from the model
//! is read. Every field is defaulted, so normalization never fails.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use crate::types::{
    Cost, CostCategory, CostDetail, ItineraryItem, Meals, QuoteInfo, TravelQuoteData, TripSummary,
};

/// Detail texts the model emits when a cell was empty.
const PLACEHOLDER_DETAILS: [&str; 2] = ["정보없음", "내용없음"];

/// Keyword table for category inference, checked top to bottom.
const CATEGORY_KEYWORDS: [(CostCategory, &[&str]); 5] = [
    (
        CostCategory::Hotel,
        &["숙소", "리조트", "호텔", "배드", "bed", "room", "박"],
    ),
    (
        CostCategory::Vehicle,
        &["버스", "교통", "차량", "픽업", "샌딩"],
    ),
    (CostCategory::Sightseeing, &["입장", "투어", "티켓", "관람"]),
    (
        CostCategory::Meal,
        &["조식", "중식", "석식", "식사", "특식", "간식"],
    ),
    (
        CostCategory::Guide,
        &["가이드", "기사", "팁", "인솔자", "핸들링"],
    ),
];

/// Normalize a parsed model payload. Non-object input yields an empty record.
pub fn normalize(raw: &Value) -> TravelQuoteData {
    let quote_info = raw.get("quote_info");
    let trip = raw.get("trip_summary");
    let cost = raw.get("cost");

    TravelQuoteData {
        quote_info: normalize_quote_info(quote_info),
        trip_summary: normalize_trip_summary(trip),
        cost: normalize_cost(cost),
        itinerary: normalize_itinerary(raw.get("itinerary")),
    }
}

fn normalize_quote_info(raw: Option<&Value>) -> QuoteInfo {
    QuoteInfo {
        code: text(field(raw, "code")),
        agency: text(field(raw, "agency")),
        manager_note: text(field(raw, "manager_note")),
        quote_date: optional_text(field(raw, "quote_date")),
    }
}

fn normalize_trip_summary(raw: Option<&Value>) -> TripSummary {
    TripSummary {
        title: text(field(raw, "title")),
        pax_adult: count(field(raw, "pax_adult")).unwrap_or(0),
        pax_child: count(field(raw, "pax_child")).unwrap_or(0),
        period_text: text(field(raw, "period_text")),
        start_date: text(field(raw, "start_date")),
        end_date: optional_text(field(raw, "end_date")),
        nights: count(field(raw, "nights")),
        days: count(field(raw, "days")),
        countries: tag_list(field(raw, "countries")),
        cities: tag_list(field(raw, "cities")),
    }
}

fn normalize_cost(raw: Option<&Value>) -> Cost {
    let currency = scrub_currency(&text(field(raw, "currency")));

    Cost {
        total_price: number(field(raw, "total_price"))
            .map(|value| value.round() as i64)
            .unwrap_or(0),
        currency: if currency.is_empty() {
            "KRW".to_string()
        } else {
            currency
        },
        inclusions: clean_list(field(raw, "inclusions")),
        exclusions: clean_list(field(raw, "exclusions")),
        shopping_conditions: text(field(raw, "shopping_conditions")),
        details: field(raw, "details")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(normalize_detail).collect())
            .unwrap_or_default(),
        exchange_rates: exchange_rates(field(raw, "exchangeRates")),
        internal_pax_adult: count(field(raw, "internal_pax_adult")),
        internal_pax_child: count(field(raw, "internal_pax_child")),
        show_details_in_quote: field(raw, "show_details_in_quote")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Normalize one raw cost line, or `None` when it carries neither text nor amount.
fn normalize_detail(raw: &Value) -> Option<CostDetail> {
    let raw = Some(raw);
    let declared = text(field(raw, "category"));
    let mut detail = text(field(raw, "detail")).trim().to_string();
    let raw_amount = number(field(raw, "amount")).unwrap_or(0.0);

    if detail.is_empty() && raw_amount == 0.0 {
        debug!(
            target: "travel_quote::normalize",
            category = %declared,
            "dropping empty cost detail"
        );
        return None;
    }

    if PLACEHOLDER_DETAILS.contains(&detail.as_str()) {
        detail.clear();
    }

    let declared_label = if declared.is_empty() {
        CostCategory::Other.label()
    } else {
        declared.as_str()
    };
    let category = infer_category(declared_label, &detail);
    if category.label() != declared_label {
        debug!(
            target: "travel_quote::normalize",
            from = %declared_label,
            to = %category,
            detail = %detail,
            "re-categorised cost detail"
        );
    }

    let mut item = CostDetail {
        category,
        detail,
        currency: scrub_currency(&text(field(raw, "currency"))),
        amount: raw_amount,
        unit: text(field(raw, "unit")),
        quantity: number(field(raw, "quantity")).unwrap_or(1.0),
        frequency: number(field(raw, "frequency")).unwrap_or(1.0),
        unit_price: number(field(raw, "unit_price")).unwrap_or(0.0),
        profit: number(field(raw, "profit")),
        note: text(field(raw, "note")),
    };
    reconcile(&mut item);
    Some(item)
}

/// Resolve the category of a cost line.
///
/// Canonical labels other than 기타 are kept. Anything else is inferred from
/// keywords in the label and detail text, first match wins.
pub fn infer_category(declared: &str, detail: &str) -> CostCategory {
    if let Some(category) = CostCategory::from_label(declared) {
        if category != CostCategory::Other {
            return category;
        }
    }

    let combined = format!("{declared} {detail}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| combined.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(CostCategory::Other)
}

/// Enforce `amount = quantity * frequency * unit_price`.
///
/// A positive unit price wins; otherwise a positive amount back-derives the
/// unit price. Amounts are kept on a 1e-6 grid so repeated reconciliation is
/// stable.
pub fn reconcile(item: &mut CostDetail) {
    let multiplier = item.quantity * item.frequency;
    if item.unit_price > 0.0 {
        item.amount = round_micro(multiplier * item.unit_price);
    } else if item.amount > 0.0 {
        item.amount = round_micro(item.amount);
        if multiplier != 0.0 {
            item.unit_price = item.amount / multiplier;
        }
    }
}

pub(crate) fn round_micro(value: f64) -> f64 {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

fn normalize_itinerary(raw: Option<&Value>) -> Vec<ItineraryItem> {
    let Some(days) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    days.iter()
        .filter(|day| day.is_object())
        .map(|day| {
            let day = Some(day);
            let meals = field(day, "meals");
            ItineraryItem {
                day: count(field(day, "day")).unwrap_or(0),
                location: text(field(day, "location")),
                transport: text(field(day, "transport")),
                activities: string_items(field(day, "activities")).collect(),
                meals: Meals {
                    breakfast: text(field(meals, "breakfast")),
                    lunch: text(field(meals, "lunch")),
                    dinner: text(field(meals, "dinner")),
                },
                hotel: text(field(day, "hotel")),
            }
        })
        .collect()
}

fn suffix_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [r"불포함\s*입니다\.?", r"포함\s*입니다\.?", r"입니다\.?"].map(|pattern| {
            Regex::new(pattern).unwrap_or_else(|err| panic!("invalid suffix pattern: {err}"))
        })
    })
}

/// Split comma-joined entries and strip conversational suffixes.
///
/// `["개인경비, 매너팁 불포함 입니다."]` becomes `["개인경비", "매너팁"]`.
pub fn clean_list_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    entries
        .into_iter()
        .flat_map(|entry| entry.split(','))
        .map(|piece| {
            suffix_patterns()
                .iter()
                .fold(piece.to_string(), |acc, pattern| {
                    pattern.replace_all(&acc, "").into_owned()
                })
                .trim()
                .to_string()
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn clean_list(raw: Option<&Value>) -> Vec<String> {
    let entries: Vec<String> = string_items(raw).collect();
    clean_list_entries(entries.iter().map(String::as_str))
}

fn tag_list(raw: Option<&Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    string_items(raw)
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}

fn exchange_rates(raw: Option<&Value>) -> BTreeMap<String, f64> {
    raw.and_then(Value::as_object)
        .map(|rates: &Map<String, Value>| {
            rates
                .iter()
                .filter_map(|(code, rate)| number(Some(rate)).map(|rate| (code.clone(), rate)))
                .collect()
        })
        .unwrap_or_default()
}

fn scrub_currency(currency: &str) -> String {
    let trimmed = currency.trim();
    if trimmed.eq_ignore_ascii_case("NULL") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn field<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    parent.and_then(|value| value.get(key))
}

/// Strings pass through, numbers are stringified, everything else is empty.
fn text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_text(raw: Option<&Value>) -> Option<String> {
    Some(text(raw)).filter(|value| !value.is_empty())
}

fn string_items(raw: Option<&Value>) -> impl Iterator<Item = String> + '_ {
    raw.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// JSON numbers, or strings like "1,200". Anything else is `None`.
fn number(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
    .filter(|value| value.is_finite())
}

fn count(raw: Option<&Value>) -> Option<u32> {
    number(raw).map(|value| value.max(0.0).round().min(f64::from(u32::MAX)) as u32)
}

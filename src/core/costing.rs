use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::format::format_number;
use crate::types::{CostCategory, CostDetail, TravelQuoteData};

/// Bucket used for lines with no currency.
pub const DEFAULT_CURRENCY: &str = "KRW";

/// Which numeric field(s) of a line contribute to a total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TotalField {
    Amount,
    Profit,
    #[default]
    Combined,
}

impl TotalField {
    fn value_of(self, item: &CostDetail) -> f64 {
        match self {
            TotalField::Amount => item.amount,
            TotalField::Profit => item.profit_or_zero(),
            TotalField::Combined => item.amount + item.profit_or_zero(),
        }
    }
}

/// Sums keyed by currency, in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrencyTotals {
    buckets: Vec<(String, f64)>,
}

impl CurrencyTotals {
    fn add(&mut self, currency: String, value: f64) {
        match self.buckets.iter_mut().find(|(code, _)| *code == currency) {
            Some((_, total)) => *total += value,
            None => self.buckets.push((currency, value)),
        }
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|(code, _)| code == currency)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.buckets.iter().map(|(code, total)| (code.as_str(), *total))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// `"USD 160 + KRW 100,000"`, or `"0"` when there are no lines.
    pub fn display(&self) -> String {
        if self.buckets.is_empty() {
            return "0".to_string();
        }
        self.buckets
            .iter()
            .map(|(code, total)| format!("{code} {}", format_number(*total)))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl fmt::Display for CurrencyTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Trimmed, upper-cased currency code; empty maps to KRW.
pub fn normalize_currency_code(raw: &str) -> String {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        code
    }
}

/// KRW and the literal "원" are both won.
pub fn is_krw(code: &str) -> bool {
    let code = code.trim();
    code.eq_ignore_ascii_case(DEFAULT_CURRENCY) || code == "원"
}

/// Group lines by currency and sum the selected field.
pub fn currency_totals<'a>(
    details: impl IntoIterator<Item = &'a CostDetail>,
    field: TotalField,
) -> CurrencyTotals {
    details
        .into_iter()
        .fold(CurrencyTotals::default(), |mut totals, item| {
            totals.add(normalize_currency_code(&item.currency), field.value_of(item));
            totals
        })
}

/// Same as [`currency_totals`], restricted to one category.
pub fn category_totals(
    details: &[CostDetail],
    category: CostCategory,
    field: TotalField,
) -> CurrencyTotals {
    currency_totals(
        details.iter().filter(|item| item.category == category),
        field,
    )
}

/// Look up a manually entered rate; codes are matched case-insensitively.
pub fn exchange_rate(rates: &BTreeMap<String, f64>, currency: &str) -> Option<f64> {
    rates.get(currency).copied().or_else(|| {
        rates
            .iter()
            .find(|(code, _)| code.trim().eq_ignore_ascii_case(currency))
            .map(|(_, rate)| *rate)
    })
}

/// Total of all lines converted to KRW, rounded to the nearest won.
///
/// Foreign buckets without a rate contribute nothing.
pub fn krw_total(details: &[CostDetail], rates: &BTreeMap<String, f64>) -> i64 {
    krw_total_of(&currency_totals(details, TotalField::Combined), rates)
}

fn krw_total_of(totals: &CurrencyTotals, rates: &BTreeMap<String, f64>) -> i64 {
    let sum: f64 = totals
        .iter()
        .map(|(code, total)| {
            if is_krw(code) {
                total
            } else {
                total * exchange_rate(rates, code).unwrap_or(0.0)
            }
        })
        .sum();
    round_to_i64(sum)
}

/// Adults plus children used for internal costing, before the divide-by-zero floor.
pub fn counted_pax(record: &TravelQuoteData) -> u32 {
    record
        .effective_pax_adult()
        .saturating_add(record.effective_pax_child())
}

/// Divisor for per-person figures, never below 1.
pub fn effective_pax(record: &TravelQuoteData) -> u32 {
    counted_pax(record).max(1)
}

/// `round(krw_total / effective_pax)`
pub fn per_person_krw(record: &TravelQuoteData) -> i64 {
    let total = krw_total(&record.cost.details, &record.cost.exchange_rates);
    round_to_i64(total as f64 / f64::from(effective_pax(record)))
}

/// Distinct foreign currency codes in first-occurrence order.
pub fn foreign_currencies(details: &[CostDetail]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for item in details {
        let code = item.currency.trim().to_uppercase();
        if code.is_empty() || is_krw(&code) || codes.contains(&code) {
            continue;
        }
        codes.push(code);
    }
    codes
}

fn round_to_i64(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Totals for one category card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: CostCategory,
    pub line_count: usize,
    pub totals: CurrencyTotals,
}

/// Every derived figure the editor and the printed quote display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub amount_totals: CurrencyTotals,
    pub profit_totals: CurrencyTotals,
    pub totals: CurrencyTotals,
    /// Non-empty categories in display order
    pub categories: Vec<CategorySummary>,
    pub krw_total: i64,
    pub per_person_krw: i64,
    pub pax_adult: u32,
    pub pax_child: u32,
    /// Adults plus children, may be 0
    pub counted_pax: u32,
    pub foreign_currencies: Vec<String>,
    /// Rates in effect for the foreign currencies, in the same order
    pub applied_rates: Vec<(String, f64)>,
}

impl CostSummary {
    pub fn compute(record: &TravelQuoteData) -> Self {
        let details = &record.cost.details;
        let rates = &record.cost.exchange_rates;
        let totals = currency_totals(details, TotalField::Combined);
        let krw_total = krw_total_of(&totals, rates);
        let foreign_currencies = foreign_currencies(details);
        let applied_rates = foreign_currencies
            .iter()
            .filter_map(|code| {
                exchange_rate(rates, code)
                    .filter(|rate| *rate > 0.0)
                    .map(|rate| (code.clone(), rate))
            })
            .collect();

        let categories = CostCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let line_count = details.iter().filter(|d| d.category == category).count();
                (line_count > 0).then(|| CategorySummary {
                    category,
                    line_count,
                    totals: category_totals(details, category, TotalField::Combined),
                })
            })
            .collect();

        Self {
            amount_totals: currency_totals(details, TotalField::Amount),
            profit_totals: currency_totals(details, TotalField::Profit),
            totals,
            categories,
            krw_total,
            per_person_krw: round_to_i64(krw_total as f64 / f64::from(effective_pax(record))),
            pax_adult: record.effective_pax_adult(),
            pax_child: record.effective_pax_child(),
            counted_pax: counted_pax(record),
            foreign_currencies,
            applied_rates,
        }
    }

    pub fn has_foreign_currency(&self) -> bool {
        !self.foreign_currencies.is_empty()
    }

    /// Per-currency totals divided by the real head count; empty when nobody is counted.
    pub fn per_person_by_currency(&self) -> Vec<(String, i64)> {
        if self.counted_pax == 0 {
            return Vec::new();
        }
        let pax = f64::from(self.counted_pax);
        self.totals
            .iter()
            .map(|(code, total)| (code.to_string(), round_to_i64(total / pax)))
            .collect()
    }
}

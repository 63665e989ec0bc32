use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies the quote (quote number, partner agency, free-form manager note).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteInfo {
    /// Quote code (견적코드), e.g. "QJ0060322200"
    pub code: String,
    /// Partner travel agency name (여행사명)
    pub agency: String,
    /// Manager note shown between inclusions and the itinerary
    #[serde(default)]
    pub manager_note: String,
    /// Date the quote was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_date: Option<String>,
}

/// Trip headline: title, party size, duration and destinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripSummary {
    /// Trip title (여행 상품명)
    pub title: String,
    /// Adult count (성인 인원)
    pub pax_adult: u32,
    /// Child count (아동 인원)
    pub pax_child: u32,
    /// Human readable duration, e.g. "3박 5일"
    pub period_text: String,
    /// Start date (YYYY-MM-DD) or empty
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nights: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Countries visited, first occurrence order
    #[serde(default)]
    pub countries: Vec<String>,
    /// Cities visited, first occurrence order
    #[serde(default)]
    pub cities: Vec<String>,
}

/// Cost line category. Serialized with the Korean labels used on quotes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum CostCategory {
    #[serde(rename = "항공")]
    Flight,
    #[serde(rename = "호텔")]
    Hotel,
    #[serde(rename = "차량")]
    Vehicle,
    #[serde(rename = "가이드")]
    Guide,
    #[serde(rename = "관광지")]
    Sightseeing,
    #[serde(rename = "식사")]
    Meal,
    #[default]
    #[serde(rename = "기타")]
    Other,
}

impl CostCategory {
    /// Display order used by editors and the rendered quote.
    pub const ALL: [CostCategory; 7] = [
        CostCategory::Flight,
        CostCategory::Hotel,
        CostCategory::Vehicle,
        CostCategory::Guide,
        CostCategory::Sightseeing,
        CostCategory::Meal,
        CostCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Flight => "항공",
            CostCategory::Hotel => "호텔",
            CostCategory::Vehicle => "차량",
            CostCategory::Guide => "가이드",
            CostCategory::Sightseeing => "관광지",
            CostCategory::Meal => "식사",
            CostCategory::Other => "기타",
        }
    }

    /// Exact match against the canonical labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }

    /// Section heading on the printed quote
    pub fn heading(self) -> &'static str {
        match self {
            CostCategory::Flight => "항공",
            CostCategory::Hotel => "호텔/숙박",
            CostCategory::Vehicle => "차량/교통",
            CostCategory::Guide => "가이드/기사",
            CostCategory::Sightseeing => "관광지/입장료",
            CostCategory::Meal => "식사",
            CostCategory::Other => "기타",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CostCategory::Flight => "✈️",
            CostCategory::Hotel => "🏨",
            CostCategory::Vehicle => "🚌",
            CostCategory::Guide => "🧑‍💼",
            CostCategory::Sightseeing => "🎫",
            CostCategory::Meal => "🍽️",
            CostCategory::Other => "📦",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One internal cost line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostDetail {
    /// Cost category (항공, 호텔, 차량, 가이드, 관광지, 식사, 기타)
    pub category: CostCategory,
    /// Detailed item name (e.g. 힐튼호텔 2박, 45인승 버스)
    pub detail: String,
    /// Currency code or symbol as written; empty when unknown
    pub currency: String,
    /// Total cost of the line
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_multiplier")]
    pub quantity: f64,
    #[serde(default = "default_multiplier")]
    pub frequency: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default)]
    pub note: String,
}

fn default_multiplier() -> f64 {
    1.0
}

impl CostDetail {
    /// Blank line item in `category` with unit multipliers.
    pub fn new(category: CostCategory) -> Self {
        Self {
            category,
            detail: String::new(),
            currency: String::new(),
            amount: 0.0,
            unit: String::new(),
            quantity: 1.0,
            frequency: 1.0,
            unit_price: 0.0,
            profit: None,
            note: String::new(),
        }
    }

    pub fn profit_or_zero(&self) -> f64 {
        self.profit.unwrap_or(0.0)
    }
}

impl Default for CostDetail {
    fn default() -> Self {
        Self::new(CostCategory::Other)
    }
}

/// Customer-facing price plus the internal cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cost {
    /// Customer-facing price for one person
    pub total_price: i64,
    /// Currency of `total_price`
    pub currency: String,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    /// Shopping / option conditions (e.g. "노쇼핑 노옵션")
    pub shopping_conditions: String,
    /// Internal cost breakdown (내부 정산용 원가 내역)
    #[serde(default)]
    pub details: Vec<CostDetail>,
    /// Manually entered KRW rate per currency code
    #[serde(default, rename = "exchangeRates")]
    pub exchange_rates: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_pax_adult: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_pax_child: Option<u32>,
    #[serde(default)]
    pub show_details_in_quote: bool,
}

impl Default for Cost {
    fn default() -> Self {
        Self {
            total_price: 0,
            currency: "KRW".to_string(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            shopping_conditions: String::new(),
            details: Vec::new(),
            exchange_rates: BTreeMap::new(),
            internal_pax_adult: None,
            internal_pax_child: None,
            show_details_in_quote: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
}

/// One day of the itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryItem {
    /// 1-based day number
    pub day: u32,
    pub location: String,
    pub transport: String,
    /// Activities in chronological order
    pub activities: Vec<String>,
    pub meals: Meals,
    pub hotel: String,
}

impl ItineraryItem {
    /// Empty day card with a single blank activity slot.
    pub fn blank(day: u32) -> Self {
        Self {
            day,
            activities: vec![String::new()],
            ..Self::default()
        }
    }
}

/// Aggregate root of a travel quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TravelQuoteData {
    pub quote_info: QuoteInfo,
    pub trip_summary: TripSummary,
    pub cost: Cost,
    pub itinerary: Vec<ItineraryItem>,
}

impl TravelQuoteData {
    /// Adults used for internal per-person costing
    pub fn effective_pax_adult(&self) -> u32 {
        self.cost
            .internal_pax_adult
            .unwrap_or(self.trip_summary.pax_adult)
    }

    /// Children used for internal per-person costing
    pub fn effective_pax_child(&self) -> u32 {
        self.cost
            .internal_pax_child
            .unwrap_or(self.trip_summary.pax_child)
    }
}

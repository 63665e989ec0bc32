use crate::core::costing::is_krw;
use crate::core::normalize::{reconcile, round_micro};
use crate::core::period::{set_period, sync_period};
use crate::error::{QuoteError, Result};
use crate::types::{CostCategory, CostDetail, ItineraryItem, TravelQuoteData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteInfoField {
    Code,
    Agency,
    ManagerNote,
    QuoteDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripField {
    Title,
    PeriodText,
    StartDate,
    EndDate,
}

/// Inclusion or exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Inclusions,
    Exclusions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Countries,
    Cities,
}

/// Single-field change to one cost line.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailChange {
    Category(CostCategory),
    Detail(String),
    Currency(String),
    /// Direct override; only back-derives the unit price when it was 0
    Amount(f64),
    Unit(String),
    Quantity(f64),
    Frequency(f64),
    UnitPrice(f64),
    Profit(Option<f64>),
    Note(String),
}

/// Single-field change to one itinerary day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayChange {
    Location(String),
    Transport(String),
    Hotel(String),
    Breakfast(String),
    Lunch(String),
    Dinner(String),
}

/// One user edit. Positions are zero-based indices into the current record.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteEdit {
    SetQuoteInfo { field: QuoteInfoField, value: String },
    SetTrip { field: TripField, value: String },
    SetPaxAdult(u32),
    SetPaxChild(u32),
    SetPeriod { nights: u32, days: u32 },
    AddTag { kind: TagKind, value: String },
    RemoveTag { kind: TagKind, index: usize },

    SetTotalPrice(i64),
    SetCurrency(String),
    SetShoppingConditions(String),
    SetInternalPaxAdult(Option<u32>),
    SetInternalPaxChild(Option<u32>),
    SetShowDetails(bool),
    SetExchangeRate { currency: String, rate: f64 },

    AddListItem { list: ListKind },
    SetListItem { list: ListKind, index: usize, value: String },
    RemoveListItem { list: ListKind, index: usize },
    MoveListItem { list: ListKind, from: usize, to: usize },

    AddCostDetail { category: CostCategory },
    UpdateCostDetail { index: usize, change: DetailChange },
    RemoveCostDetail { index: usize },
    MoveCostDetail { from: usize, to: usize },

    AddDay,
    RemoveDay { index: usize },
    MoveDay { from: usize, to: usize },
    UpdateDay { index: usize, change: DayChange },
    AddActivity { day: usize },
    SetActivity { day: usize, index: usize, value: String },
    RemoveActivity { day: usize, index: usize },
}

impl QuoteEdit {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            QuoteEdit::SetQuoteInfo { .. } => "set_quote_info",
            QuoteEdit::SetTrip { .. } => "set_trip",
            QuoteEdit::SetPaxAdult(_) => "set_pax_adult",
            QuoteEdit::SetPaxChild(_) => "set_pax_child",
            QuoteEdit::SetPeriod { .. } => "set_period",
            QuoteEdit::AddTag { .. } => "add_tag",
            QuoteEdit::RemoveTag { .. } => "remove_tag",
            QuoteEdit::SetTotalPrice(_) => "set_total_price",
            QuoteEdit::SetCurrency(_) => "set_currency",
            QuoteEdit::SetShoppingConditions(_) => "set_shopping_conditions",
            QuoteEdit::SetInternalPaxAdult(_) => "set_internal_pax_adult",
            QuoteEdit::SetInternalPaxChild(_) => "set_internal_pax_child",
            QuoteEdit::SetShowDetails(_) => "set_show_details",
            QuoteEdit::SetExchangeRate { .. } => "set_exchange_rate",
            QuoteEdit::AddListItem { .. } => "add_list_item",
            QuoteEdit::SetListItem { .. } => "set_list_item",
            QuoteEdit::RemoveListItem { .. } => "remove_list_item",
            QuoteEdit::MoveListItem { .. } => "move_list_item",
            QuoteEdit::AddCostDetail { .. } => "add_cost_detail",
            QuoteEdit::UpdateCostDetail { .. } => "update_cost_detail",
            QuoteEdit::RemoveCostDetail { .. } => "remove_cost_detail",
            QuoteEdit::MoveCostDetail { .. } => "move_cost_detail",
            QuoteEdit::AddDay => "add_day",
            QuoteEdit::RemoveDay { .. } => "remove_day",
            QuoteEdit::MoveDay { .. } => "move_day",
            QuoteEdit::UpdateDay { .. } => "update_day",
            QuoteEdit::AddActivity { .. } => "add_activity",
            QuoteEdit::SetActivity { .. } => "set_activity",
            QuoteEdit::RemoveActivity { .. } => "remove_activity",
        }
    }
}

/// Apply one edit and return the resulting snapshot.
pub fn apply_edit(record: &TravelQuoteData, edit: QuoteEdit) -> Result<TravelQuoteData> {
    let mut next = record.clone();

    match edit {
        QuoteEdit::SetQuoteInfo { field, value } => {
            let info = &mut next.quote_info;
            match field {
                QuoteInfoField::Code => info.code = value,
                QuoteInfoField::Agency => info.agency = value,
                QuoteInfoField::ManagerNote => info.manager_note = value,
                QuoteInfoField::QuoteDate => {
                    info.quote_date = Some(value).filter(|v| !v.is_empty())
                }
            }
        }
        QuoteEdit::SetTrip { field, value } => {
            let trip = &mut next.trip_summary;
            match field {
                TripField::Title => trip.title = value,
                TripField::PeriodText => trip.period_text = value,
                TripField::StartDate => trip.start_date = value,
                TripField::EndDate => trip.end_date = Some(value).filter(|v| !v.is_empty()),
            }
        }
        QuoteEdit::SetPaxAdult(count) => next.trip_summary.pax_adult = count,
        QuoteEdit::SetPaxChild(count) => next.trip_summary.pax_child = count,
        QuoteEdit::SetPeriod { nights, days } => set_period(&mut next.trip_summary, nights, days),
        QuoteEdit::AddTag { kind, value } => {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(QuoteError::invalid_edit("tag must not be empty"));
            }
            let tags = tags_mut(&mut next, kind);
            if !tags.contains(&value) {
                tags.push(value);
            }
        }
        QuoteEdit::RemoveTag { kind, index } => {
            let tags = tags_mut(&mut next, kind);
            check_index(tags.len(), index, "tag")?;
            tags.remove(index);
        }

        QuoteEdit::SetTotalPrice(price) => next.cost.total_price = price,
        QuoteEdit::SetCurrency(currency) => next.cost.currency = currency,
        QuoteEdit::SetShoppingConditions(value) => next.cost.shopping_conditions = value,
        QuoteEdit::SetInternalPaxAdult(count) => next.cost.internal_pax_adult = count,
        QuoteEdit::SetInternalPaxChild(count) => next.cost.internal_pax_child = count,
        QuoteEdit::SetShowDetails(show) => next.cost.show_details_in_quote = show,
        QuoteEdit::SetExchangeRate { currency, rate } => {
            let code = currency.trim().to_uppercase();
            if code.is_empty() {
                return Err(QuoteError::invalid_edit("exchange rate needs a currency code"));
            }
            if !rate.is_finite() || rate < 0.0 {
                return Err(QuoteError::invalid_edit(format!(
                    "exchange rate for {code} must be a non-negative number"
                )));
            }
            next.cost.exchange_rates.insert(code, rate);
        }

        QuoteEdit::AddListItem { list } => list_mut(&mut next, list).push(String::new()),
        QuoteEdit::SetListItem { list, index, value } => {
            let items = list_mut(&mut next, list);
            check_index(items.len(), index, "list item")?;
            items[index] = value;
        }
        QuoteEdit::RemoveListItem { list, index } => {
            let items = list_mut(&mut next, list);
            check_index(items.len(), index, "list item")?;
            items.remove(index);
        }
        QuoteEdit::MoveListItem { list, from, to } => {
            move_item(list_mut(&mut next, list), from, to, "list item")?
        }

        QuoteEdit::AddCostDetail { category } => {
            let mut item = CostDetail::new(category);
            item.currency = inherited_currency(&next.cost.details, category);
            next.cost.details.push(item);
        }
        QuoteEdit::UpdateCostDetail { index, change } => {
            check_index(next.cost.details.len(), index, "cost detail")?;
            update_detail(&mut next.cost.details[index], change);
        }
        QuoteEdit::RemoveCostDetail { index } => {
            check_index(next.cost.details.len(), index, "cost detail")?;
            next.cost.details.remove(index);
        }
        QuoteEdit::MoveCostDetail { from, to } => {
            move_item(&mut next.cost.details, from, to, "cost detail")?
        }

        QuoteEdit::AddDay => {
            next.itinerary.push(ItineraryItem::blank(0));
            renumber_days(&mut next.itinerary);
            sync_period(&mut next.trip_summary, next.itinerary.len());
        }
        QuoteEdit::RemoveDay { index } => {
            check_index(next.itinerary.len(), index, "itinerary day")?;
            next.itinerary.remove(index);
            renumber_days(&mut next.itinerary);
            sync_period(&mut next.trip_summary, next.itinerary.len());
        }
        QuoteEdit::MoveDay { from, to } => {
            move_item(&mut next.itinerary, from, to, "itinerary day")?;
            renumber_days(&mut next.itinerary);
        }
        QuoteEdit::UpdateDay { index, change } => {
            check_index(next.itinerary.len(), index, "itinerary day")?;
            let day = &mut next.itinerary[index];
            match change {
                DayChange::Location(value) => day.location = value,
                DayChange::Transport(value) => day.transport = value,
                DayChange::Hotel(value) => day.hotel = value,
                DayChange::Breakfast(value) => day.meals.breakfast = value,
                DayChange::Lunch(value) => day.meals.lunch = value,
                DayChange::Dinner(value) => day.meals.dinner = value,
            }
        }
        QuoteEdit::AddActivity { day } => {
            check_index(next.itinerary.len(), day, "itinerary day")?;
            next.itinerary[day].activities.push(String::new());
        }
        QuoteEdit::SetActivity { day, index, value } => {
            check_index(next.itinerary.len(), day, "itinerary day")?;
            let activities = &mut next.itinerary[day].activities;
            check_index(activities.len(), index, "activity")?;
            activities[index] = value;
        }
        QuoteEdit::RemoveActivity { day, index } => {
            check_index(next.itinerary.len(), day, "itinerary day")?;
            let activities = &mut next.itinerary[day].activities;
            check_index(activities.len(), index, "activity")?;
            activities.remove(index);
        }
    }

    Ok(next)
}

fn update_detail(item: &mut CostDetail, change: DetailChange) {
    match change {
        DetailChange::Category(category) => item.category = category,
        DetailChange::Detail(value) => item.detail = value,
        DetailChange::Currency(value) => item.currency = value,
        DetailChange::Amount(amount) => {
            let had_unit_price = item.unit_price != 0.0;
            item.amount = round_micro(amount);
            let multiplier = item.quantity * item.frequency;
            if !had_unit_price && item.amount > 0.0 && multiplier != 0.0 {
                item.unit_price = item.amount / multiplier;
            }
        }
        DetailChange::Unit(value) => item.unit = value,
        DetailChange::Quantity(quantity) => {
            item.quantity = quantity;
            reconcile(item);
        }
        DetailChange::Frequency(frequency) => {
            item.frequency = frequency;
            reconcile(item);
        }
        DetailChange::UnitPrice(unit_price) => {
            item.unit_price = unit_price;
            reconcile(item);
        }
        DetailChange::Profit(profit) => item.profit = profit,
        DetailChange::Note(value) => item.note = value,
    }
}

/// Currency for a new line: the last non-KRW currency used in the same
/// category, otherwise empty.
pub fn inherited_currency(details: &[CostDetail], category: CostCategory) -> String {
    details
        .iter()
        .rev()
        .find(|item| item.category == category)
        .map(|item| item.currency.trim())
        .filter(|currency| !currency.is_empty() && !is_krw(currency))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Renumber days to 1..N in display order.
pub fn renumber_days(itinerary: &mut [ItineraryItem]) {
    for (idx, day) in itinerary.iter_mut().enumerate() {
        day.day = u32::try_from(idx + 1).unwrap_or(u32::MAX);
    }
}

fn list_mut(record: &mut TravelQuoteData, list: ListKind) -> &mut Vec<String> {
    match list {
        ListKind::Inclusions => &mut record.cost.inclusions,
        ListKind::Exclusions => &mut record.cost.exclusions,
    }
}

fn tags_mut(record: &mut TravelQuoteData, kind: TagKind) -> &mut Vec<String> {
    match kind {
        TagKind::Countries => &mut record.trip_summary.countries,
        TagKind::Cities => &mut record.trip_summary.cities,
    }
}

fn check_index(len: usize, index: usize, what: &str) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(QuoteError::invalid_edit(format!(
            "{what} index {index} is out of range (len {len})"
        )))
    }
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize, what: &str) -> Result<()> {
    check_index(items.len(), from, what)?;
    check_index(items.len(), to, what)?;
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_details(details: Vec<CostDetail>) -> TravelQuoteData {
        let mut record = TravelQuoteData::default();
        record.cost.details = details;
        record
    }

    fn detail(category: CostCategory, currency: &str) -> CostDetail {
        CostDetail {
            currency: currency.to_string(),
            ..CostDetail::new(category)
        }
    }

    #[test]
    fn input_snapshot_is_untouched() {
        let record = record_with_details(vec![detail(CostCategory::Hotel, "USD")]);
        let next = apply_edit(&record, QuoteEdit::RemoveCostDetail { index: 0 }).unwrap();
        assert_eq!(record.cost.details.len(), 1);
        assert!(next.cost.details.is_empty());
    }

    #[test]
    fn new_detail_inherits_non_krw_currency_from_same_category() {
        let record = record_with_details(vec![
            detail(CostCategory::Hotel, "MYR"),
            detail(CostCategory::Vehicle, "USD"),
            detail(CostCategory::Hotel, "RM"),
            detail(CostCategory::Meal, "KRW"),
        ]);
        let next = apply_edit(
            &record,
            QuoteEdit::AddCostDetail {
                category: CostCategory::Hotel,
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[4].currency, "RM");
        assert_eq!(next.cost.details[4].quantity, 1.0);

        let next = apply_edit(
            &record,
            QuoteEdit::AddCostDetail {
                category: CostCategory::Meal,
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[4].currency, "");

        let next = apply_edit(
            &record,
            QuoteEdit::AddCostDetail {
                category: CostCategory::Guide,
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[4].currency, "");
    }

    #[test]
    fn unit_fields_recompute_amount() {
        let record = record_with_details(vec![detail(CostCategory::Hotel, "USD")]);
        let record = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::UnitPrice(120.0),
            },
        )
        .unwrap();
        let record = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::Quantity(2.0),
            },
        )
        .unwrap();
        let record = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::Frequency(3.0),
            },
        )
        .unwrap();
        assert_eq!(record.cost.details[0].amount, 720.0);
    }

    #[test]
    fn amount_override_keeps_existing_unit_price() {
        let mut item = detail(CostCategory::Hotel, "USD");
        item.unit_price = 100.0;
        item.amount = 100.0;
        let record = record_with_details(vec![item]);
        let next = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::Amount(250.0),
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[0].amount, 250.0);
        assert_eq!(next.cost.details[0].unit_price, 100.0);
    }

    #[test]
    fn amount_override_back_derives_missing_unit_price() {
        let mut item = detail(CostCategory::Hotel, "USD");
        item.quantity = 2.0;
        let record = record_with_details(vec![item]);
        let next = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::Amount(300.0),
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[0].unit_price, 150.0);
    }

    #[test]
    fn category_change_only_rebuckets() {
        let mut item = detail(CostCategory::Other, "USD");
        item.amount = 42.0;
        let record = record_with_details(vec![item]);
        let next = apply_edit(
            &record,
            QuoteEdit::UpdateCostDetail {
                index: 0,
                change: DetailChange::Category(CostCategory::Meal),
            },
        )
        .unwrap();
        assert_eq!(next.cost.details[0].category, CostCategory::Meal);
        assert_eq!(next.cost.details[0].amount, 42.0);
        assert_eq!(next.cost.details[0].unit_price, 0.0);
    }

    #[test]
    fn exchange_rate_codes_are_uppercased() {
        let record = TravelQuoteData::default();
        let next = apply_edit(
            &record,
            QuoteEdit::SetExchangeRate {
                currency: " usd ".to_string(),
                rate: 1350.5,
            },
        )
        .unwrap();
        assert_eq!(next.cost.exchange_rates.get("USD"), Some(&1350.5));

        let err = apply_edit(
            &record,
            QuoteEdit::SetExchangeRate {
                currency: "USD".to_string(),
                rate: f64::NAN,
            },
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_EDIT");
    }

    #[test]
    fn add_day_renumbers_and_syncs_period() {
        let mut record = TravelQuoteData::default();
        record.trip_summary.period_text = "1박 2일".to_string();
        record.itinerary = vec![ItineraryItem::blank(1), ItineraryItem::blank(2)];
        let next = apply_edit(&record, QuoteEdit::AddDay).unwrap();
        assert_eq!(next.itinerary[2].day, 3);
        assert_eq!(next.itinerary[2].activities, vec![String::new()]);
        assert_eq!(next.trip_summary.period_text, "2박 3일");
    }

    #[test]
    fn move_day_renumbers() {
        let mut record = TravelQuoteData::default();
        record.itinerary = (1..=3)
            .map(|day| ItineraryItem {
                location: format!("L{day}"),
                ..ItineraryItem::blank(day)
            })
            .collect();
        let next = apply_edit(&record, QuoteEdit::MoveDay { from: 2, to: 0 }).unwrap();
        let order: Vec<_> = next
            .itinerary
            .iter()
            .map(|d| (d.day, d.location.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "L3"), (2, "L1"), (3, "L2")]);
    }

    #[test]
    fn out_of_range_edits_fail() {
        let record = TravelQuoteData::default();
        for edit in [
            QuoteEdit::RemoveDay { index: 0 },
            QuoteEdit::RemoveCostDetail { index: 3 },
            QuoteEdit::SetListItem {
                list: ListKind::Inclusions,
                index: 0,
                value: "x".to_string(),
            },
            QuoteEdit::AddActivity { day: 0 },
            QuoteEdit::MoveCostDetail { from: 0, to: 0 },
        ] {
            let err = apply_edit(&record, edit).unwrap_err();
            assert!(matches!(err, QuoteError::InvalidEdit(_)));
        }
    }

    #[test]
    fn tags_ignore_duplicates() {
        let record = TravelQuoteData::default();
        let add = |record: &TravelQuoteData, value: &str| {
            apply_edit(
                record,
                QuoteEdit::AddTag {
                    kind: TagKind::Cities,
                    value: value.to_string(),
                },
            )
        };
        let next = add(&record, "도쿄").unwrap();
        let next = add(&next, " 도쿄 ").unwrap();
        assert_eq!(next.trip_summary.cities, vec!["도쿄"]);
        assert!(add(&next, "  ").is_err());
    }
}

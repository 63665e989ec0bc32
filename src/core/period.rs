use regex::Regex;
use std::sync::OnceLock;

use crate::types::TripSummary;

/// Nights and days parsed from a period text. Either may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub nights: Option<u32>,
    pub days: Option<u32>,
}

fn nights_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)박").unwrap_or_else(|err| panic!("invalid nights pattern: {err}"))
    })
}

fn days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)일").unwrap_or_else(|err| panic!("invalid days pattern: {err}"))
    })
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl Period {
    pub fn parse(text: &str) -> Self {
        Self {
            nights: capture_number(nights_pattern(), text),
            days: capture_number(days_pattern(), text),
        }
    }

    /// Days minus nights for the current text.
    ///
    /// With only a day count the nights are assumed to be one fewer. A gap of
    /// 0 (including unparseable text) means "use the default of 1".
    pub fn gap(&self) -> u32 {
        let (nights, days) = match (self.nights, self.days) {
            (Some(nights), Some(days)) => (nights, days),
            (None, Some(days)) => (days.saturating_sub(1), days),
            _ => (0, 0),
        };
        days.saturating_sub(nights)
    }
}

pub fn format_period(nights: u32, days: u32) -> String {
    format!("{nights}박 {days}일")
}

/// Rewrite the period for an itinerary of `day_count` cards, keeping the
/// existing nights/days gap.
pub fn sync_period(trip: &mut TripSummary, day_count: usize) {
    let gap = match Period::parse(&trip.period_text).gap() {
        0 => 1,
        gap => gap,
    };
    let days = u32::try_from(day_count).unwrap_or(u32::MAX);
    let nights = days.saturating_sub(gap);

    trip.period_text = format_period(nights, days);
    if trip.nights.is_some() {
        trip.nights = Some(nights);
    }
    if trip.days.is_some() {
        trip.days = Some(days);
    }
}

/// Set the period explicitly, text and integer fields together.
pub fn set_period(trip: &mut TripSummary, nights: u32, days: u32) {
    trip.period_text = format_period(nights, days);
    trip.nights = Some(nights);
    trip.days = Some(days);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nights_and_days() {
        assert_eq!(
            Period::parse("3박 5일"),
            Period {
                nights: Some(3),
                days: Some(5)
            }
        );
        assert_eq!(Period::parse("5일").nights, None);
        assert_eq!(Period::parse("미정"), Period::default());
    }

    #[test]
    fn gap_defaults() {
        assert_eq!(Period::parse("3박 5일").gap(), 2);
        assert_eq!(Period::parse("4일").gap(), 1);
        assert_eq!(Period::parse("3박").gap(), 0);
        assert_eq!(Period::parse("").gap(), 0);
    }

    #[test]
    fn sync_keeps_gap() {
        let mut trip = TripSummary {
            period_text: "3박 5일".to_string(),
            ..TripSummary::default()
        };
        sync_period(&mut trip, 6);
        assert_eq!(trip.period_text, "4박 6일");
        assert_eq!(trip.nights, None);

        let mut trip = TripSummary::default();
        sync_period(&mut trip, 1);
        assert_eq!(trip.period_text, "0박 1일");
    }

    #[test]
    fn sync_updates_present_integer_fields() {
        let mut trip = TripSummary {
            period_text: "2박 3일".to_string(),
            nights: Some(2),
            days: Some(3),
            ..TripSummary::default()
        };
        sync_period(&mut trip, 2);
        assert_eq!(trip.period_text, "1박 2일");
        assert_eq!((trip.nights, trip.days), (Some(1), Some(2)));
    }

    #[test]
    fn set_period_writes_all_fields() {
        let mut trip = TripSummary::default();
        set_period(&mut trip, 4, 6);
        assert_eq!(trip.period_text, "4박 6일");
        assert_eq!((trip.nights, trip.days), (Some(4), Some(6)));
    }
}

use regex::Regex;
use std::sync::OnceLock;

const MAX_FRACTION_DIGITS: usize = 3;

/// Format a number with Korean locale grouping ("1234567.5" -> "1,234,567.5").
///
/// At most three fraction digits are kept and trailing zeros are dropped.
/// Non-finite values format as "0".
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Format an integer amount with thousands separators.
pub fn format_integer(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    if value < 0 {
        format!("-{}", group_thousands(&digits))
    } else {
        group_thousands(&digits)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn number_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .unwrap_or_else(|err| panic!("invalid number pattern: {err}"))
    })
}

/// Parse user-entered numbers that may contain thousands separators.
///
/// The longest leading numeric prefix is used ("1,200원" -> 1200). `None`
/// when there is no numeric prefix at all.
pub fn parse_number(input: &str) -> Option<f64> {
    let cleaned: String = input.chars().filter(|c| *c != ',').collect();
    number_prefix()
        .find(cleaned.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

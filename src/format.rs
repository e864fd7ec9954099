//! Brazilian Real and percentage text conversion.
//!
//! The engine works on [`Decimal`] values; these helpers convert to and from
//! the text a form or report uses: `R$ 1.234,56` for money and `12,50%` for
//! percentages (comma decimal separator, dot thousands separator).

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses BRL currency text into a decimal amount.
///
/// The currency symbol and any whitespace are ignored, dots are treated as
/// thousands separators and the comma as the decimal separator. Returns `None`
/// for empty or unparseable text.
///
/// Every dot is dropped, so dot-decimal text is read as BRL: `"12.50"` parses
/// as 1250, not 12.5.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::format::parse_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(parse_currency("R$ 1.234,56"), Some(Decimal::from_str("1234.56").unwrap()));
/// assert_eq!(parse_currency("abc"), None);
/// ```
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, 'R' | '$') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = cleaned.replace('.', "").replacen(',', ".", 1);
    Decimal::from_str(&normalized).ok()
}

/// Formats an amount as BRL currency text, rounded half away from zero to cents.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::format::format_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_currency(Decimal::from_str("1234.565").unwrap()), "R$ 1.234,57");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let text = magnitude.to_string();
    let (integer, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{}R$ {},{}", sign, group_thousands(integer), cents)
}

/// Parses percentage text (`12,5%`, `12.5`, `20 %`) into percentage points.
///
/// Returns `None` for empty or unparseable text. Range checking is left to
/// [`crate::models::Percent`].
pub fn parse_percent(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(&trimmed.replace(',', ".")).ok()
}

/// Formats percentage points as text with two decimals and a trailing `%`.
///
/// # Examples
///
/// ```
/// use outsourcing_cost_engine::format::format_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percent(Decimal::new(83, 1)), "8,30%");
/// ```
pub fn format_percent(points: Decimal) -> String {
    let mut rounded = points.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{}%", rounded.to_string().replace('.', ","))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

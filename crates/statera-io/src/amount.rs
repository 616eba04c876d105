//! Lenient amount parsing for user-entered text

use once_cell::sync::OnceCell;
use regex::Regex;
use rust_decimal::Decimal;
use statera_core::MAX_AMOUNT;
use std::str::FromStr;

/// Outcome of coercing free text into an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coerced {
    pub value: Decimal,
    /// The text was not a number and `value` fell back to zero
    pub malformed: bool,
}

impl From<Option<Decimal>> for Coerced {
    fn from(parsed: Option<Decimal>) -> Self {
        match parsed {
            Some(value) => Self { value, malformed: false },
            None => Self {
                value: Decimal::ZERO,
                malformed: true,
            },
        }
    }
}

fn within_bounds(value: Decimal) -> Option<Decimal> {
    (value.abs() <= MAX_AMOUNT).then_some(value)
}

fn noise_pattern() -> &'static Regex {
    static NOISE: OnceCell<Regex> = OnceCell::new();
    NOISE.get_or_init(|| Regex::new(r"[^\d\-,.]").expect("static amount pattern"))
}

/// Parse an amount such as `"$ 1,234.50"`, `"1.234,50"` or `"12,5"`.
///
/// Currency symbols, spaces and letters are dropped. A single comma with
/// no dot is a decimal comma. When both appear, whichever comes last is
/// the decimal separator and the other one groups thousands. Blank text
/// is zero. Returns `None` when what remains is not a number or its
/// magnitude exceeds [`MAX_AMOUNT`].
pub fn parse_amount(text: &str) -> Option<Decimal> {
    if text.trim().is_empty() {
        return Some(Decimal::ZERO);
    }

    let cleaned = noise_pattern().replace_all(text, "");
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (Some(_), None) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned.into_owned(),
    };

    Decimal::from_str(&normalized).ok().and_then(within_bounds)
}

/// Parse the text of a JSON number, accepting exponent notation such as
/// `1.5e3`. Out-of-range values are `None`.
pub fn parse_json_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .and_then(within_bounds)
}

/// Parse an amount, substituting zero for malformed text
pub fn coerce_amount(text: &str) -> Coerced {
    Coerced::from(parse_amount(text))
}

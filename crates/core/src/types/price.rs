//! Colombian peso prices.
//!
//! Prices travel through the storefront as display strings in the
//! Spanish-Colombian convention: `.` groups thousands and `,` separates the
//! decimals (`12.500`, `1.250.000,50`). [`Price`] holds the decimal amount
//! and converts between that display form and raw upstream values.
//!
//! ```
//! use cyberduck_core::Price;
//!
//! let price = Price::parse_display("12.500").unwrap();
//! assert_eq!(price.display(), "12.500");
//!
//! let raw = Price::from_json(&serde_json::json!(12500)).unwrap();
//! assert_eq!(raw, price);
//! ```

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Number of fraction digits shown in a display string.
const DISPLAY_DECIMALS: u32 = 2;

/// Currency markers tolerated around a display string.
const CURRENCY_MARKERS: &[&str] = &["COP", "$"];

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty (after trimming currency markers).
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a Colombian-formatted amount.
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// An amount in Colombian pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero pesos.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a Colombian display string such as `12.500` or `$ 1.250,50`.
    ///
    /// A leading `-`, a leading `$` or `COP` marker and surrounding whitespace
    /// are accepted. Thousands groups must be exactly three digits.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Empty`] for blank input and
    /// [`PriceError::Invalid`] when the digits do not follow the convention.
    pub fn parse_display(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let (negative, unsigned) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let body = strip_currency(unsigned);

        if body.is_empty() {
            return Err(PriceError::Empty);
        }

        let invalid = || PriceError::Invalid(input.to_owned());

        let (integer, fraction) = match body.split_once(',') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (body, None),
        };

        let mut canonical = canonical_integer(integer).ok_or_else(invalid)?;
        if let Some(fraction) = fraction {
            if fraction.is_empty() || !is_all_digits(fraction) {
                return Err(invalid());
            }
            canonical.push('.');
            canonical.push_str(fraction);
        }

        let amount = Decimal::from_str(&canonical).map_err(|_| invalid())?;
        Ok(Self(if negative { -amount } else { amount }))
    }

    /// Convert a raw upstream JSON value into a price.
    ///
    /// Numbers are read from their own decimal text (`12500.5`), strings are
    /// read as display strings first and as plain decimals second. Anything
    /// else yields `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .ok()
                    .map(Self)
            }
            Value::String(text) => Self::parse_display(text)
                .ok()
                .or_else(|| Decimal::from_str(text.trim()).ok().map(Self)),
            _ => None,
        }
    }

    /// Add two prices, or `None` if the sum overflows.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Format as a Colombian display string.
    ///
    /// The amount is rounded half away from zero to two decimals; a zero
    /// fraction is omitted.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded.abs());
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&group_thousands(integer));
        if fraction.chars().any(|c| c != '0') {
            out.push(',');
            out.push_str(fraction);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_display(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn strip_currency(input: &str) -> &str {
    let mut rest = input.trim();
    for marker in CURRENCY_MARKERS {
        if let Some(stripped) = rest.strip_prefix(*marker) {
            rest = stripped.trim_start();
        }
    }
    rest.strip_suffix("COP").map_or(rest, str::trim_end)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip `.` group separators, checking every group after the first has
/// exactly three digits.
fn canonical_integer(integer: &str) -> Option<String> {
    if !integer.contains('.') {
        return is_all_digits(integer).then(|| integer.to_owned());
    }

    let mut groups = integer.split('.');
    let first = groups.next()?;
    if first.len() > 3 || !is_all_digits(first) {
        return None;
    }

    let mut digits = first.to_owned();
    for group in groups {
        if group.len() != 3 || !is_all_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(price("0").display(), "0");
        assert_eq!(price("999").display(), "999");
        assert_eq!(price("12500").display(), "12.500");
        assert_eq!(price("1250000").display(), "1.250.000");
    }

    #[test]
    fn test_display_fraction() {
        assert_eq!(price("12500.5").display(), "12.500,50");
        assert_eq!(price("12500.00").display(), "12.500");
        assert_eq!(price("0.125").display(), "0,13");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(price("-12500").display(), "-12.500");
        assert_eq!(price("-0.001").display(), "0");
    }

    #[test]
    fn test_parse_display_round_trip() {
        assert_eq!(Price::parse_display("12.500").unwrap(), price("12500"));
        assert_eq!(Price::parse_display("12.500").unwrap().display(), "12.500");
        assert_eq!(
            Price::parse_display("1.250.000,50").unwrap(),
            price("1250000.50")
        );
        assert_eq!(Price::parse_display("999").unwrap(), price("999"));
    }

    #[test]
    fn test_parse_display_currency_markers() {
        assert_eq!(Price::parse_display("$ 12.500").unwrap(), price("12500"));
        assert_eq!(Price::parse_display("COP $12.500").unwrap(), price("12500"));
        assert_eq!(Price::parse_display("12.500 COP").unwrap(), price("12500"));
        assert_eq!(Price::parse_display("-$12.500").unwrap(), price("-12500"));
    }

    #[test]
    fn test_parse_display_rejects_malformed() {
        assert_eq!(Price::parse_display("   "), Err(PriceError::Empty));
        assert_eq!(Price::parse_display("$"), Err(PriceError::Empty));
        assert!(matches!(
            Price::parse_display("12.50"),
            Err(PriceError::Invalid(_))
        ));
        assert!(matches!(
            Price::parse_display("1234.500"),
            Err(PriceError::Invalid(_))
        ));
        assert!(matches!(
            Price::parse_display("12.500,"),
            Err(PriceError::Invalid(_))
        ));
        assert!(matches!(
            Price::parse_display("doce mil"),
            Err(PriceError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_json_number_and_string_agree() {
        let from_number = Price::from_json(&json!(12500)).unwrap();
        let from_string = Price::from_json(&json!("12.500")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.display(), "12.500");
    }

    #[test]
    fn test_from_json_decimal_number_uses_point() {
        let p = Price::from_json(&json!(12500.5)).unwrap();
        assert_eq!(p.display(), "12.500,50");
    }

    #[test]
    fn test_from_json_plain_decimal_string_fallback() {
        let p = Price::from_json(&json!("19.99")).unwrap();
        assert_eq!(p, price("19.99"));
    }

    #[test]
    fn test_from_json_rejects_other_values() {
        assert!(Price::from_json(&json!(null)).is_none());
        assert!(Price::from_json(&json!(true)).is_none());
        assert!(Price::from_json(&json!("gratis")).is_none());
    }

    #[test]
    fn test_checked_add() {
        let total = ["12.500", "7.500", "0,50"]
            .iter()
            .map(|s| Price::parse_display(s).unwrap())
            .try_fold(Price::ZERO, Price::checked_add)
            .unwrap();
        assert_eq!(total.display(), "20.000,50");
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Price::parse_display("79.228.162.514.264.337.593.543.950.335").unwrap();
        assert_eq!(max, Price::new(Decimal::MAX));
        assert_eq!(max.checked_add(max), None);
        assert_eq!(max.checked_add(Price::ZERO), Some(max));
    }

    #[test]
    fn test_serde_uses_display_string() {
        let p = price("12500");
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"12.500\"");
        let back: Price = serde_json::from_str("\"12.500\"").unwrap();
        assert_eq!(back, p);
    }
}

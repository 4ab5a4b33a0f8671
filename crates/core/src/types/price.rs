//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are computed on `Decimal` values, never on floats. Prices are
//! still persisted as plain JSON numbers (`"priceValue": 4000`) so the stored
//! cart stays readable by anything that reads the `ff_cart_v1` key.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Unit price used when a product carries no usable numeric price.
///
/// Applies to missing, `null`, negative and non-numeric values alike, so the
/// cart total is always defined.
pub const MISSING_PRICE_VALUE: Decimal = Decimal::ZERO;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g. pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display with a currency symbol and thousands separators
    /// (e.g. `₱4,000.00`).
    ///
    /// At least two decimal places are shown. Amounts finer than a cent keep
    /// all their digits (`₱0.005`), so the display never rounds and always
    /// parses back to `amount`.
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount.normalize();
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        let places = usize::try_from(amount.scale().max(2)).unwrap_or(2);
        let text = format!("{:.places$}", amount.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!(
            "{sign}{}{}.{fraction}",
            self.currency_code.symbol(),
            group_thousands(whole)
        )
    }

    /// Extract a numeric amount from a formatted display price.
    ///
    /// Keeps only ASCII digits and `.`, so `₱4,000.00` yields `4000.00`.
    /// Ranges such as `₱30,799.00 - ₱42,199.00` collapse into something that
    /// is not a number and yield `None`.
    #[must_use]
    pub fn parse_display_amount(text: &str) -> Option<Decimal> {
        let digits: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if digits.is_empty() {
            return None;
        }
        Decimal::from_str(&digits).ok()
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Error parsing a currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency code: {0}")]
pub struct CurrencyError(pub String);

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PHP" => Ok(Self::PHP),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyError(s.to_string())),
        }
    }
}

/// Serde adapter storing a `Decimal` as a JSON number.
///
/// Whole amounts that fit an `i64` are written as integers, everything else
/// as the nearest `f64`. Reading is lenient: numbers and numeric strings are
/// accepted, anything else (including negative amounts) becomes
/// [`MISSING_PRICE_VALUE`].
///
/// Every price that enters a cart goes through [`normalize`], which snaps it
/// to the value its JSON form reads back as. A saved cart therefore loads
/// back equal to what was saved.
pub mod price_value {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};

    use super::MISSING_PRICE_VALUE;

    /// Serialize a price as a JSON number.
    ///
    /// # Errors
    ///
    /// Fails if the amount cannot be represented as an `f64`.
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match to_number(*value) {
            Some(number) => number.serialize(serializer),
            None => Err(S::Error::custom(format!("price {value} is out of range"))),
        }
    }

    /// Deserialize a price, coercing unusable values to zero.
    ///
    /// # Errors
    ///
    /// Only fails if the underlying deserializer fails.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(from_json)
            .map_or(MISSING_PRICE_VALUE, normalize))
    }

    /// Snap a price to the value its stored JSON number reads back as.
    ///
    /// Whole amounts within `i64` are unchanged. Anything else is rounded to
    /// the nearest `f64` (`0.1234567890123456789` becomes
    /// `0.12345678901234568`). Negative or unrepresentable amounts become
    /// [`MISSING_PRICE_VALUE`].
    #[must_use]
    pub fn normalize(value: Decimal) -> Decimal {
        to_number(value)
            .and_then(|number| from_json(&Value::Number(number)))
            .unwrap_or(MISSING_PRICE_VALUE)
    }

    fn to_number(value: Decimal) -> Option<Number> {
        if value.fract().is_zero()
            && let Some(whole) = value.to_i64()
        {
            return Some(Number::from(whole));
        }
        // Decimal text parses to the correctly rounded f64.
        let float = value.to_string().parse::<f64>().ok()?;
        Number::from_f64(float)
    }

    /// Interpret a JSON value as a non-negative price.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Decimal> {
        let parsed = match value {
            // Go through the shortest textual form so 19.99 stays 19.99.
            Value::Number(n) => parse(&n.to_string()),
            Value::String(s) => parse(s.trim()),
            _ => None,
        }?;
        (!parsed.is_sign_negative() || parsed.is_zero()).then_some(parsed)
    }

    fn parse(text: &str) -> Option<Decimal> {
        if text.contains(['e', 'E']) {
            Decimal::from_scientific(text).ok()
        } else {
            Decimal::from_str(text).ok()
        }
    }
}

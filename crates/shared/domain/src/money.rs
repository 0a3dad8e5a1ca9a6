//! Minimal money type: a currency code and an amount in minor units.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An amount of money in the currency's minor unit (cents for `USD`, yen for `JPY`).
///
/// Serialized as `"USD 13.00"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    currency: String,
    minor: i64,
}

impl Money {
    #[must_use]
    pub fn new(currency: impl Into<String>, minor: i64) -> Self {
        Self { currency: currency.into().to_ascii_uppercase(), minor }
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor
    }

    /// Multiplies by a whole number of years, `None` on overflow.
    #[must_use]
    pub fn times(&self, years: u32) -> Option<Self> {
        self.minor
            .checked_mul(i64::from(years))
            .map(|minor| Self { currency: self.currency.clone(), minor })
    }

    fn scale(currency: &str) -> u32 {
        match currency {
            "JPY" | "KRW" => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = Self::scale(&self.currency);
        if scale == 0 {
            return write!(f, "{} {}", self.currency, self.minor);
        }
        let divisor = 10_i64.pow(scale);
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let divisor = divisor.unsigned_abs();
        write!(
            f,
            "{} {sign}{}.{:0width$}",
            self.currency,
            abs / divisor,
            abs % divisor,
            width = scale as usize
        )
    }
}

/// Error returned when a money string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoneyError(pub String);

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid money value '{}'", self.0)
    }
}

impl std::error::Error for ParseMoneyError {}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_owned());
        let (currency, amount) = s.trim().split_once(' ').ok_or_else(err)?;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(err());
        }
        let currency = currency.to_ascii_uppercase();
        let scale = Self::scale(&currency);

        let amount = amount.trim();
        let (negative, digits) = amount.strip_prefix('-').map_or((false, amount), |d| (true, d));
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > scale as usize
        {
            return Err(err());
        }

        let whole: i64 = whole.parse().map_err(|_| err())?;
        let mut fraction_value: i64 = if fraction.is_empty() { 0 } else { fraction.parse().map_err(|_| err())? };
        for _ in fraction.len()..scale as usize {
            fraction_value *= 10;
        }
        let minor = whole
            .checked_mul(10_i64.pow(scale))
            .and_then(|w| w.checked_add(fraction_value))
            .ok_or_else(err)?;

        Ok(Self { currency, minor: if negative { -minor } else { minor } })
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_two_decimal_currencies() {
        let m: Money = "usd 13.5".parse().unwrap();
        assert_eq!(m.currency(), "USD");
        assert_eq!(m.minor_units(), 1350);
        assert_eq!(m.to_string(), "USD 13.50");
    }

    #[test]
    fn parses_zero_decimal_currencies() {
        let m: Money = "JPY 1500".parse().unwrap();
        assert_eq!(m.minor_units(), 1500);
        assert!("JPY 15.5".parse::<Money>().is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("13.00".parse::<Money>().is_err());
        assert!("US 13".parse::<Money>().is_err());
        assert!("USD 1.234".parse::<Money>().is_err());
        assert!("USD abc".parse::<Money>().is_err());
    }

    #[test]
    fn multiplies_by_years() {
        let m = Money::new("USD", 1300);
        assert_eq!(m.times(3), Some(Money::new("USD", 3900)));
        assert_eq!(Money::new("USD", i64::MAX).times(2), None);
    }
}

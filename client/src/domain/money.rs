//! Monetary amounts reported by the service.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Amount in the service's reporting currency, with exact decimal fractions.
///
/// The service sends whole and fractional figures (`100`, `12.75`) as JSON
/// numbers and sometimes as numeric strings; all of them decode. Encoding
/// always produces a JSON number.
///
/// Arithmetic saturates rather than overflowing so a corrupt figure can never
/// poison an aggregate.
///
/// # Examples
/// ```
/// use shopdesk::domain::Amount;
///
/// let amount: Amount = serde_json::from_str("150.5").unwrap();
/// assert_eq!(amount, "150.50".parse().unwrap());
/// assert_eq!(serde_json::to_string(&amount).unwrap(), "150.5");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// The fallback figure for failed or missing sub-fetches.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Whole-unit amount.
    pub fn new(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Wrap an exact decimal.
    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Exact decimal value.
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Saturating addition.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn amount(text: &str) -> Amount {
        text.parse().expect("decimal literal")
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let total: Amount = [Amount::from_decimal(Decimal::MAX), Amount::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Amount::from_decimal(Decimal::MAX));
    }

    #[rstest]
    #[case("100", "100")]
    #[case("150.5", "150.5")]
    #[case("12.75", "12.75")]
    #[case("-3.2", "-3.2")]
    #[case("\"8.05\"", "8.05")]
    fn decodes_whole_fractional_and_textual_numbers(#[case] json: &str, #[case] expected: &str) {
        let decoded: Amount = serde_json::from_str(json).expect("numeric amount");
        assert_eq!(decoded, amount(expected));
    }

    #[test]
    fn encodes_as_a_json_number() {
        let encoded = serde_json::to_value(amount("12.75")).expect("encode");
        assert_eq!(encoded, serde_json::json!(12.75));
    }

    #[test]
    fn fractional_sums_are_exact() {
        let total: Amount = [amount("0.1"), amount("0.2")].into_iter().sum();
        assert_eq!(total, amount("0.3"));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(serde_json::from_str::<Amount>("\"ten\"").is_err());
    }
}

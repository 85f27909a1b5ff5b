//! Exact decimal currency amounts.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Error;

/// The number of digits stored after the decimal point.
const SCALE: u32 = 2;

/// The largest number of digits allowed before the decimal point.
const MAX_INTEGER_DIGITS: u32 = 10;

/// A validated, strictly positive amount of money with two decimal places.
///
/// Amounts are serialized as strings with exactly two decimal places, e.g.
/// `"10.50"`, so clients never see binary floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount from a decimal value.
    ///
    /// Trailing zeros beyond two decimal places are accepted, so `10.500` is
    /// the same amount as `10.50`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is not greater than zero,
    /// has non-zero digits after the second decimal place, or has more than
    /// ten digits before the decimal point.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::InvalidAmount(
                value.to_string(),
                "amount must be greater than zero",
            ));
        }

        if value.normalize().scale() > SCALE {
            return Err(Error::InvalidAmount(
                value.to_string(),
                "amount must have at most two decimal places",
            ));
        }

        if value.trunc() >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
            return Err(Error::InvalidAmount(
                value.to_string(),
                "amount must have at most ten digits before the decimal point",
            ));
        }

        Ok(Self::new_unchecked(value))
    }

    /// Create an amount without validation, rescaling it to two decimal places.
    ///
    /// The caller should ensure that `value` is positive and fits in the
    /// stored precision.
    pub fn new_unchecked(mut value: Decimal) -> Self {
        value.rescale(SCALE);
        Self(value)
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| Error::InvalidAmount(s.to_owned(), "amount is not a number"))?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts either a JSON string (`"10.50"`) or a JSON number (`10.5`).
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;

        Amount::new(value).map_err(de::Error::custom)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Decimal::from_str(text)
            .map(Amount::new_unchecked)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Serialize a sum of amounts as a string with exactly two decimal places.
///
/// Intended for use with `#[serde(serialize_with = "...")]` on totals, which
/// may be zero and therefore cannot be an [Amount].
pub fn serialize_total<S: Serializer>(total: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_total(*total))
}

/// Format a sum of amounts with exactly two decimal places, e.g. `"30.00"`.
pub fn format_total(total: Decimal) -> String {
    format!("{:.2}", total.round_dp(SCALE))
}

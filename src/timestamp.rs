//! Parsing and serialization of the timestamps accepted by the API.
//!
//! Clients may send any of:
//! - an RFC 3339 date-time, e.g. `2025-10-15T10:00:00Z` or `2025-10-15T10:00:00+13:00`,
//! - a date-time without an offset, e.g. `2025-10-15T10:00:00`, which is taken to be UTC,
//! - a date, e.g. `2025-10-15`, which is taken to be midnight UTC.
//!
//! All timestamps are converted to UTC so that they compare correctly when
//! stored in the database.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serializer, de};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::Error;

const NAIVE_DATE_TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    version = 2,
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The years that can be written back out as RFC 3339.
const YEAR_RANGE: RangeInclusive<i32> = 0..=9999;

/// Parse a timestamp from `text` and convert it to UTC.
///
/// # Errors
///
/// Returns an [Error::InvalidTimestamp] if `text` is not in one of the
/// accepted formats, or if the time in UTC falls outside the years 0000 to 9999.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    let date_time = if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        date_time.checked_to_offset(UtcOffset::UTC)
    } else if let Ok(date_time) = PrimitiveDateTime::parse(text, NAIVE_DATE_TIME_FORMAT) {
        Some(date_time.assume_utc())
    } else if let Ok(date) = Date::parse(text, DATE_FORMAT) {
        Some(date.midnight().assume_utc())
    } else {
        None
    };

    date_time
        .filter(|date_time| YEAR_RANGE.contains(&date_time.year()))
        .ok_or_else(|| Error::InvalidTimestamp(text.to_owned()))
}

/// Convert `date_time` to the UTC offset.
pub fn to_utc(date_time: OffsetDateTime) -> OffsetDateTime {
    date_time.to_offset(UtcOffset::UTC)
}

/// Serialize a timestamp as an RFC 3339 string.
pub fn serialize<S: Serializer>(
    date_time: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    time::serde::rfc3339::serialize(date_time, serializer)
}

/// Deserialize a timestamp from any of the accepted formats.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;

    parse_timestamp(&text).map_err(de::Error::custom)
}

/// The same as the parent module, but for optional timestamps.
///
/// Use together with `#[serde(default)]` so that a missing field becomes `None`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use time::OffsetDateTime;

    use super::parse_timestamp;

    /// Serialize an optional timestamp as an RFC 3339 string or `null`.
    pub fn serialize<S: Serializer>(
        date_time: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::option::serialize(date_time, serializer)
    }

    /// Deserialize an optional timestamp from any of the accepted formats.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .filter(|text| !text.is_empty())
            .map(|text| parse_timestamp(&text).map_err(de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::parse_timestamp;

    #[test]
    fn parses_rfc3339() {
        let got = parse_timestamp("2025-10-15T10:00:00Z").unwrap();

        assert_eq!(got, datetime!(2025-10-15 10:00:00 UTC));
    }

    #[test]
    fn converts_offsets_to_utc() {
        let got = parse_timestamp("2025-10-15T10:00:00+13:00").unwrap();

        assert_eq!(got, datetime!(2025-10-14 21:00:00 UTC));
        assert!(got.offset().is_utc());
    }

    #[test]
    fn parses_naive_date_time_as_utc() {
        assert_eq!(
            parse_timestamp("2025-10-15T10:00:00").unwrap(),
            datetime!(2025-10-15 10:00:00 UTC)
        );
        assert_eq!(
            parse_timestamp("2025-10-15T10:00:00.250").unwrap(),
            datetime!(2025-10-15 10:00:00.25 UTC)
        );
    }

    #[test]
    fn parses_date_as_midnight_utc() {
        let got = parse_timestamp("2025-10-17").unwrap();

        assert_eq!(got, datetime!(2025-10-17 00:00:00 UTC));
    }

    #[test]
    fn rejects_years_that_cannot_be_formatted() {
        assert_eq!(
            parse_timestamp("0000-01-01T00:30:00+01:00"),
            Err(Error::InvalidTimestamp("0000-01-01T00:30:00+01:00".to_owned()))
        );
        assert!(parse_timestamp("9999-12-31T23:30:00-01:00").is_err());
        assert_eq!(
            parse_timestamp("0000-01-01T00:30:00Z").unwrap(),
            datetime!(0000-01-01 00:30:00 UTC)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_timestamp("last tuesday"),
            Err(Error::InvalidTimestamp("last tuesday".to_owned()))
        );
    }
}

//! Database queries for retrieving report data.
//!
//! This module provides a simplified expense view for aggregations,
//! containing only the fields needed for grouping and summing.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Error, amount::Amount, timestamp::to_utc};

/// A simplified expense view for report aggregations.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ReportExpense {
    pub amount: Amount,
    pub spent_at: OffsetDateTime,
    pub category: String,
}

/// Gets the expenses spent between `from_date` and `to_date`, inclusive.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - an expense row cannot be mapped
pub(super) fn get_expenses_in_range(
    from_date: OffsetDateTime,
    to_date: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<ReportExpense>, Error> {
    connection
        .prepare(
            "SELECT amount, spent_at, category FROM expense \
             WHERE spent_at >= ?1 AND spent_at <= ?2",
        )?
        .query_map((to_utc(from_date), to_utc(to_date)), |row| {
            Ok(ReportExpense {
                amount: row.get(0)?,
                spent_at: row.get(1)?,
                category: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<ReportExpense>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

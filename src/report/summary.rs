//! Expense totals per group over a date range.

use axum::{Json, extract::State};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    amount::serialize_total,
    db::lock_connection,
    extract::ApiQuery,
    report::{
        GroupBy, ReportParams, ReportState,
        aggregation::{aggregate_by_group, grand_total},
        query::get_expenses_in_range,
    },
};

/// The total spent in one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// The group label, e.g. "2025-10-15", "2025-10" or "Food".
    pub label: String,
    /// The sum of the amounts in the group.
    #[serde(serialize_with = "serialize_total")]
    pub total: Decimal,
}

/// Expense totals per group over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The start of the date range.
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub from: OffsetDateTime,
    /// The end of the date range.
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub to: OffsetDateTime,
    /// How the expenses were grouped.
    pub group_by: GroupBy,
    /// The total for each group, sorted by label.
    pub buckets: Vec<Bucket>,
    /// The sum of all amounts in the date range. Equal to the sum of the bucket totals.
    #[serde(serialize_with = "serialize_total")]
    pub grand_total: Decimal,
}

/// Summarise the expenses spent between `from_date` and `to_date`, inclusive.
///
/// If no expenses match, `buckets` is empty and `grand_total` is zero.
///
/// # Errors
/// Returns an [Error::SqlError] if the expenses cannot be read.
pub fn get_summary(
    from_date: OffsetDateTime,
    to_date: OffsetDateTime,
    group_by: GroupBy,
    connection: &Connection,
) -> Result<Summary, Error> {
    let expenses = get_expenses_in_range(from_date, to_date, connection)?;

    let buckets = aggregate_by_group(&expenses, group_by)
        .into_iter()
        .map(|(label, total)| Bucket { label, total })
        .collect();

    Ok(Summary {
        from: from_date,
        to: to_date,
        group_by,
        buckets,
        grand_total: grand_total(&expenses),
    })
}

/// A route handler for summarising expenses over a date range.
pub async fn get_summary_endpoint(
    State(state): State<ReportState>,
    ApiQuery(params): ApiQuery<ReportParams>,
) -> Result<Json<Summary>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let summary = get_summary(params.from_date, params.to_date, params.group_by, &connection)?;

    tracing::debug!(
        "Summarised expenses by {} into {} buckets",
        params.group_by,
        summary.buckets.len()
    );

    Ok(Json(summary))
}

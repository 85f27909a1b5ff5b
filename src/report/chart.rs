//! Expense totals as a sorted series of points for charting.

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
        GroupBy, ReportParams, ReportState, aggregation::aggregate_by_group,
        query::get_expenses_in_range,
    },
};

/// One point in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// The group label, e.g. "2025-10-15", "2025-10" or "Food".
    pub timestamp: String,
    /// The sum of the amounts in the group.
    #[serde(serialize_with = "serialize_total")]
    pub value: Decimal,
}

/// Get the expense totals between `from_date` and `to_date`, inclusive, as
/// points sorted in ascending order of their group label.
///
/// # Errors
/// Returns an [Error::SqlError] if the expenses cannot be read.
pub fn get_chart_series(
    from_date: OffsetDateTime,
    to_date: OffsetDateTime,
    group_by: GroupBy,
    connection: &Connection,
) -> Result<Vec<ChartPoint>, Error> {
    let expenses = get_expenses_in_range(from_date, to_date, connection)?;

    let points = aggregate_by_group(&expenses, group_by)
        .into_iter()
        .map(|(timestamp, value)| ChartPoint { timestamp, value })
        .collect();

    Ok(points)
}

/// A route handler for getting chart data for expenses over a date range.
pub async fn get_chart_endpoint(
    State(state): State<ReportState>,
    ApiQuery(params): ApiQuery<ReportParams>,
) -> Result<Json<Vec<ChartPoint>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_chart_series(params.from_date, params.to_date, params.group_by, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use time::{Duration, macros::datetime};

    use crate::{
        expense::create_expense,
        report::{
            GroupBy,
            chart::{ChartPoint, get_chart_series},
        },
        test_utils::{must_create_test_connection, new_test_expense},
    };

    #[test]
    fn daily_series_is_sorted() {
        let conn = must_create_test_connection();
        let start = datetime!(2025-10-01 12:00 UTC);
        // Insert out of order so that insertion order cannot explain the result.
        for day in [5, 1, 3, 2, 4] {
            create_expense(
                new_test_expense("Coffee", "4.50", "Food", start + Duration::days(day)),
                &conn,
            )
            .unwrap();
        }

        let series =
            get_chart_series(start, start + Duration::days(10), GroupBy::Day, &conn).unwrap();

        let timestamps: Vec<&str> = series.iter().map(|point| point.timestamp.as_str()).collect();
        assert_eq!(
            timestamps,
            vec!["2025-10-02", "2025-10-03", "2025-10-04", "2025-10-05", "2025-10-06"]
        );
        assert!(series.iter().all(|point| point.value == Decimal::new(450, 2)));
    }

    #[test]
    fn monthly_series_sums_and_sorts() {
        let conn = must_create_test_connection();
        create_expense(
            new_test_expense("Rent", "1200.00", "Home", datetime!(2025-11-01 09:00 UTC)),
            &conn,
        )
        .unwrap();
        create_expense(
            new_test_expense("Rent", "1200.00", "Home", datetime!(2025-10-01 09:00 UTC)),
            &conn,
        )
        .unwrap();
        create_expense(
            new_test_expense("Power", "85.40", "Home", datetime!(2025-10-20 09:00 UTC)),
            &conn,
        )
        .unwrap();

        let series = get_chart_series(
            datetime!(2025-10-01 00:00 UTC),
            datetime!(2025-11-30 00:00 UTC),
            GroupBy::Month,
            &conn,
        )
        .unwrap();

        assert_eq!(
            series,
            vec![
                ChartPoint {
                    timestamp: "2025-10".to_owned(),
                    value: Decimal::new(128540, 2)
                },
                ChartPoint {
                    timestamp: "2025-11".to_owned(),
                    value: Decimal::new(120000, 2)
                },
            ]
        );
        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            json!([
                { "timestamp": "2025-10", "value": "1285.40" },
                { "timestamp": "2025-11", "value": "1200.00" }
            ])
        );
    }

    #[test]
    fn empty_range_has_no_points() {
        let conn = must_create_test_connection();

        let series = get_chart_series(
            datetime!(2025-10-01 00:00 UTC),
            datetime!(2025-10-31 00:00 UTC),
            GroupBy::Category,
            &conn,
        )
        .unwrap();

        assert!(series.is_empty());
    }
}

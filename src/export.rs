//! Exporting expenses over a date range as CSV or JSON.

use axum::{
    Json,
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use csv::{Terminator, WriterBuilder};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    db::lock_connection,
    expense::{Expense, ExpenseQuery, ExpenseState, list_expenses},
    extract::ApiQuery,
    timestamp,
};

/// The most expenses a single export will contain.
pub const EXPORT_LIMIT: u32 = 200;

const CSV_HEADER: [&str; 8] = [
    "id",
    "title",
    "amount",
    "currency",
    "category",
    "note",
    "spent_at",
    "created_at",
];

/// The file format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated values with a header row.
    Csv,
    /// A JSON array of expenses.
    Json,
}

/// The query string for the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportParams {
    /// Only include expenses spent at or after this time.
    #[serde(with = "timestamp")]
    pub from_date: OffsetDateTime,
    /// Only include expenses spent at or before this time.
    #[serde(with = "timestamp")]
    pub to_date: OffsetDateTime,
    /// The format to export the expenses in.
    pub format: ExportFormat,
}

/// Expenses rendered in an [ExportFormat].
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    /// The CSV text, including the header row.
    Csv(String),
    /// The expenses to be serialized as a JSON array.
    Json(Vec<Expense>),
}

impl IntoResponse for Export {
    fn into_response(self) -> Response {
        match self {
            Export::Csv(text) => {
                ([(CONTENT_TYPE, "text/csv; charset=utf-8")], text).into_response()
            }
            Export::Json(expenses) => Json(expenses).into_response(),
        }
    }
}

/// Export the expenses spent between `from_date` and `to_date`, inclusive.
///
/// At most [EXPORT_LIMIT] expenses are exported, in the same order as
/// [list_expenses].
///
/// # Errors
/// Returns an [Error::SqlError] if the expenses cannot be read, or an
/// [Error::CsvError] if they cannot be written as CSV.
pub fn export_expenses(
    from_date: OffsetDateTime,
    to_date: OffsetDateTime,
    format: ExportFormat,
    connection: &Connection,
) -> Result<Export, Error> {
    let query = ExpenseQuery {
        limit: EXPORT_LIMIT,
        from_date: Some(from_date),
        to_date: Some(to_date),
        ..Default::default()
    };
    let expenses = list_expenses(&query, connection)?;

    tracing::debug!("Exporting {} expenses as {format:?}", expenses.len());

    match format {
        ExportFormat::Csv => expenses_to_csv(&expenses).map(Export::Csv),
        ExportFormat::Json => Ok(Export::Json(expenses)),
    }
}

/// Write `expenses` as CSV text.
///
/// The header row is always written, even when there are no expenses.
/// Fields containing commas, quotes or line breaks are quoted.
pub fn expenses_to_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for expense in expenses {
        writer.serialize(expense)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// A route handler for exporting expenses.
pub async fn export_endpoint(
    State(state): State<ExpenseState>,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> Result<Export, Error> {
    let connection = lock_connection(&state.db_connection)?;

    export_expenses(params.from_date, params.to_date, params.format, &connection)
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::{Duration, macros::datetime};

    use crate::{
        Expense,
        expense::create_expense,
        export::{EXPORT_LIMIT, Export, ExportFormat, expenses_to_csv, export_expenses},
        test_utils::{
            assert_content_type, must_create_test_connection, must_parse_json, new_test_expense,
        },
    };

    #[test]
    fn csv_response_has_csv_content_type() {
        let response = Export::Csv("id\r\n".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/csv; charset=utf-8");
    }

    #[tokio::test]
    async fn json_response_is_array_of_expenses() {
        let conn = must_create_test_connection();
        let expense = create_expense(
            new_test_expense("Test Expense", "10.50", "Test", datetime!(2025-10-15 10:00 UTC)),
            &conn,
        )
        .unwrap();

        let response = Export::Json(vec![expense.clone()]).into_response();

        assert_content_type(&response, "application/json");
        let expenses: Vec<Expense> = must_parse_json(response).await;
        assert_eq!(expenses, vec![expense]);
    }

    #[test]
    fn csv_with_no_expenses_is_header_only() {
        let conn = must_create_test_connection();

        let export = export_expenses(
            datetime!(2025-10-15 00:00 UTC),
            datetime!(2025-10-16 00:00 UTC),
            ExportFormat::Csv,
            &conn,
        )
        .unwrap();

        assert_eq!(
            export,
            Export::Csv("id,title,amount,currency,category,note,spent_at,created_at\r\n".to_owned())
        );
    }

    #[test]
    fn json_with_no_expenses_is_empty() {
        let conn = must_create_test_connection();

        let export = export_expenses(
            datetime!(2025-10-15 00:00 UTC),
            datetime!(2025-10-16 00:00 UTC),
            ExportFormat::Json,
            &conn,
        )
        .unwrap();

        assert_eq!(export, Export::Json(Vec::new()));
    }

    #[test]
    fn csv_has_one_row_per_expense() {
        let conn = must_create_test_connection();
        let expense = create_expense(
            new_test_expense("Test Expense", "10.5", "Test", datetime!(2025-10-15 10:00 UTC)),
            &conn,
        )
        .unwrap();

        let csv = expenses_to_csv(&[expense.clone()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            format!(
                "{},Test Expense,10.50,USD,Test,,2025-10-15T10:00:00Z,{}",
                expense.id,
                expense
                    .created_at
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap()
            )
        );
    }

    #[test]
    fn csv_quotes_special_characters() {
        let conn = must_create_test_connection();
        let expense = create_expense(
            new_test_expense(
                "Dinner, \"fancy\"",
                "42.00",
                "Food",
                datetime!(2025-10-15 19:00 UTC),
            )
            .note(Some("line one\nline two".to_owned())),
            &conn,
        )
        .unwrap();

        let csv = expenses_to_csv(&[expense]).unwrap();

        assert!(csv.contains("\"Dinner, \"\"fancy\"\"\""));
        assert!(csv.contains("\"line one\nline two\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "Dinner, \"fancy\"");
        assert_eq!(&record[5], "line one\nline two");
    }

    #[test]
    fn export_is_capped() {
        let conn = must_create_test_connection();
        let start = datetime!(2025-01-01 00:00 UTC);
        for i in 0..300 {
            create_expense(
                new_test_expense("Coffee", "3.00", "Food", start + Duration::hours(i)),
                &conn,
            )
            .unwrap();
        }

        let export =
            export_expenses(start, start + Duration::days(30), ExportFormat::Json, &conn).unwrap();

        match export {
            Export::Json(expenses) => assert_eq!(expenses.len(), EXPORT_LIMIT as usize),
            Export::Csv(_) => panic!("expected a JSON export"),
        }

        let export =
            export_expenses(start, start + Duration::days(30), ExportFormat::Csv, &conn).unwrap();

        match export {
            Export::Csv(text) => assert_eq!(text.lines().count(), EXPORT_LIMIT as usize + 1),
            Export::Json(_) => panic!("expected a CSV export"),
        }
    }

    #[test]
    fn export_only_includes_date_range() {
        let conn = must_create_test_connection();
        for day in 10..20 {
            create_expense(
                new_test_expense(
                    "Lunch",
                    "12.00",
                    "Food",
                    datetime!(2025-10-01 12:00 UTC) + Duration::days(day),
                ),
                &conn,
            )
            .unwrap();
        }

        let export = export_expenses(
            datetime!(2025-10-15 00:00 UTC),
            datetime!(2025-10-16 23:59 UTC),
            ExportFormat::Json,
            &conn,
        )
        .unwrap();

        let Export::Json(expenses) = export else {
            panic!("expected a JSON export");
        };
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].spent_at, datetime!(2025-10-15 12:00 UTC));
        assert_eq!(expenses[1].spent_at, datetime!(2025-10-16 12:00 UTC));
    }
}

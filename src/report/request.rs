//! The query string and state shared by the report route handlers.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AppState, timestamp};

/// How expenses are grouped in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Group by the calendar date (UTC) the expense was spent on, e.g. "2025-10-15".
    Day,
    /// Group by the year and month the expense was spent in, e.g. "2025-10".
    Month,
    /// Group by the expense's category, exactly as entered.
    Category,
}

impl Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GroupBy::Day => "day",
            GroupBy::Month => "month",
            GroupBy::Category => "category",
        };

        write!(f, "{name}")
    }
}

/// The query string for the summary and chart endpoints.
///
/// Both ends of the date range are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportParams {
    /// The start of the date range.
    #[serde(with = "timestamp")]
    pub from_date: OffsetDateTime,
    /// The end of the date range.
    #[serde(with = "timestamp")]
    pub to_date: OffsetDateTime,
    /// How to group the expenses.
    pub group_by: GroupBy,
}

/// The state needed for generating reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

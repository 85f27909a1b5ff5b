use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{Expense, ExpenseQuery, list_expenses},
    extract::ApiQuery,
    pagination::PaginationConfig,
    timestamp,
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how many expenses are returned.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for listing expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesParams {
    /// The number of matching expenses to skip.
    pub skip: Option<u32>,
    /// The maximum number of expenses to return.
    pub limit: Option<u32>,
    /// Only include expenses in this category. An empty string is ignored.
    pub category: Option<String>,
    /// Only include expenses spent at or after this time.
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub from_date: Option<OffsetDateTime>,
    /// Only include expenses spent at or before this time.
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub to_date: Option<OffsetDateTime>,
}

/// A route handler for listing expenses, ordered by when they were spent.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    ApiQuery(params): ApiQuery<ListExpensesParams>,
) -> Result<Json<Vec<Expense>>, Error> {
    let query = ExpenseQuery {
        skip: params.skip.unwrap_or(0),
        limit: state.pagination_config.resolve_limit(params.limit)?,
        category: params.category.filter(|category| !category.is_empty()),
        from_date: params.from_date,
        to_date: params.to_date,
    };

    let connection = lock_connection(&state.db_connection)?;
    let expenses = list_expenses(&query, &connection)?;

    Ok(Json(expenses))
}

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{Expense, ExpenseState, get_expense},
};

/// A route handler for getting a single expense by its ID.
///
/// Responds with 404 Not Found if there is no such expense.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expense(expense_id, &connection)?
        .map(Json)
        .ok_or(Error::NotFound)
}

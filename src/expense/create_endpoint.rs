use axum::{
    Json,
    extract::State,
    http::{HeaderName, StatusCode, header::LOCATION},
};

use crate::{
    Error,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    extract::ApiJson,
    expense::{CreateExpenseForm, Expense, ExpenseState, create_expense},
};

/// A route handler for creating a new expense, responds with the created expense.
///
/// The `Location` header points to the new expense.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    ApiJson(form): ApiJson<CreateExpenseForm>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Expense>), Error> {
    let new_expense = form.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let expense = create_expense(new_expense, &connection)?;
    let location = format_endpoint(endpoints::EXPENSE, expense.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(expense)))
}

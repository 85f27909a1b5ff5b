use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{EditExpenseForm, Expense, ExpenseState, update_expense},
    extract::ApiJson,
};

/// A route handler for partially updating an expense, responds with the updated expense.
///
/// Responds with 404 Not Found if there is no such expense.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    ApiJson(form): ApiJson<EditExpenseForm>,
) -> Result<Json<Expense>, Error> {
    let update = form.validate()?;

    let connection = lock_connection(&state.db_connection)?;

    update_expense(expense_id, update, &connection)?
        .map(Json)
        .ok_or(Error::NotFound)
}

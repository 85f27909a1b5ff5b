//! Expense management.
//!
//! This module contains everything related to individual expenses:
//! - The `Expense` model and the types for creating and updating expenses
//! - Database functions for storing, querying, and managing expenses
//! - Route handlers for the expense endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
mod state;

pub use core::{
    Expense, ExpenseQuery, ExpenseUpdate, NewExpense, create_expense, create_expense_table,
    delete_expense, get_expense, list_expenses, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use form::{CreateExpenseForm, EditExpenseForm};
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use state::ExpenseState;

#[cfg(test)]
pub use core::count_expenses;

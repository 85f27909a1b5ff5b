//! Defines the core data models and database queries for expenses.

use rusqlite::{
    Connection, OptionalExtension, Row, Transaction as SqlTransaction, TransactionBehavior,
    named_params, params,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, amount::Amount, database_id::ExpenseId, timestamp::to_utc};

// ============================================================================
// MODELS
// ============================================================================

/// A record of money spent on something.
///
/// To create a new `Expense`, use [Expense::build] and [create_expense].
///
/// The field order is also the column order used when exporting expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// How much was spent.
    pub amount: Amount,
    /// A three letter currency code, e.g. "USD".
    pub currency: String,
    /// A free-form category, e.g. "Food" or "Transport".
    pub category: String,
    /// Any extra details about the expense.
    pub note: Option<String>,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub spent_at: OffsetDateTime,
    /// When the expense was recorded. Never changes after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(
        title: &str,
        amount: Amount,
        currency: &str,
        category: &str,
        spent_at: OffsetDateTime,
    ) -> NewExpense {
        NewExpense {
            title: title.to_owned(),
            amount,
            currency: currency.to_owned(),
            category: category.to_owned(),
            note: None,
            spent_at,
        }
    }
}

/// The fields needed to create an [Expense].
///
/// The ID and creation time are assigned by [create_expense]. Field lengths
/// are expected to have been validated already, see
/// [crate::expense::CreateExpenseForm].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A short description of what the money was spent on.
    pub title: String,
    /// How much was spent.
    pub amount: Amount,
    /// A three letter currency code.
    pub currency: String,
    /// A free-form category.
    pub category: String,
    /// Any extra details about the expense.
    pub note: Option<String>,
    /// When the money was spent.
    pub spent_at: OffsetDateTime,
}

impl NewExpense {
    /// Set the note for the expense.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// A partial update to an [Expense].
///
/// A field set to `None` is left unchanged. `note` can also be cleared by
/// setting it to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// The new title.
    pub title: Option<String>,
    /// The new amount.
    pub amount: Option<Amount>,
    /// The new currency code.
    pub currency: Option<String>,
    /// The new category.
    pub category: Option<String>,
    /// The new note, or `Some(None)` to remove the note.
    pub note: Option<Option<String>>,
    /// The new time the money was spent.
    pub spent_at: Option<OffsetDateTime>,
}

impl ExpenseUpdate {
    /// Whether the update would leave an expense unchanged.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply_to(self, expense: &mut Expense) {
        if let Some(title) = self.title {
            expense.title = title;
        }

        if let Some(amount) = self.amount {
            expense.amount = amount;
        }

        if let Some(currency) = self.currency {
            expense.currency = currency;
        }

        if let Some(category) = self.category {
            expense.category = category;
        }

        if let Some(note) = self.note {
            expense.note = note;
        }

        if let Some(spent_at) = self.spent_at {
            expense.spent_at = to_utc(spent_at);
        }
    }
}

/// Filters and paging for [list_expenses].
///
/// Filters that are `None` do not constrain the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseQuery {
    /// The number of matching expenses to skip.
    pub skip: u32,
    /// The maximum number of expenses to return.
    pub limit: u32,
    /// Only include expenses with exactly this category.
    pub category: Option<String>,
    /// Only include expenses spent at or after this time.
    pub from_date: Option<OffsetDateTime>,
    /// Only include expenses spent at or before this time.
    pub to_date: Option<OffsetDateTime>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, title, amount, currency, category, note, spent_at, created_at";

/// Create a new expense in the database.
///
/// The creation time is set to the current time and `spent_at` is stored in UTC.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let created_at = OffsetDateTime::now_utc();

    let expense = connection
        .prepare(&format!(
            "INSERT INTO expense (title, amount, currency, category, note, spent_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                new_expense.title,
                new_expense.amount,
                new_expense.currency,
                new_expense.category,
                new_expense.note,
                to_utc(new_expense.spent_at),
                created_at,
            ),
            map_expense_row,
        )?;

    tracing::debug!("Created expense {}", expense.id);

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// Returns `Ok(None)` if there is no expense with that ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Option<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_expense_row)
        .optional()
        .map_err(Error::from)
}

/// Retrieve the expenses matching every filter in `query`.
///
/// Expenses are ordered by the time they were spent and then by ID, so paging
/// through the results with `skip` and `limit` is stable.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_expenses(query: &ExpenseQuery, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense \
             WHERE (:category IS NULL OR category = :category) \
             AND (:from_date IS NULL OR spent_at >= :from_date) \
             AND (:to_date IS NULL OR spent_at <= :to_date) \
             ORDER BY spent_at ASC, id ASC \
             LIMIT :limit OFFSET :skip"
        ))?
        .query_map(
            named_params! {
                ":category": query.category,
                ":from_date": query.from_date.map(to_utc),
                ":to_date": query.to_date.map(to_utc),
                ":limit": query.limit,
                ":skip": query.skip,
            },
            map_expense_row,
        )?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

/// Apply the fields set in `update` to the expense with `id`.
///
/// The read and the write happen in one transaction. Returns `Ok(None)` if
/// there is no expense with that ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn update_expense(
    id: ExpenseId,
    update: ExpenseUpdate,
    connection: &Connection,
) -> Result<Option<Expense>, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let Some(mut expense) = get_expense(id, &transaction)? else {
        return Ok(None);
    };

    if update.is_empty() {
        return Ok(Some(expense));
    }

    update.apply_to(&mut expense);

    let expense = transaction
        .prepare(&format!(
            "UPDATE expense \
             SET title = ?1, amount = ?2, currency = ?3, category = ?4, note = ?5, spent_at = ?6 \
             WHERE id = ?7 \
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            params![
                expense.title,
                expense.amount,
                expense.currency,
                expense.category,
                expense.note,
                expense.spent_at,
                id,
            ],
            map_expense_row,
        )?;

    transaction.commit()?;

    tracing::debug!("Updated expense {id}");

    Ok(Some(expense))
}

/// Delete the expense with `id` and return it as it was before deletion.
///
/// Returns `Ok(None)` if there is no expense with that ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<Option<Expense>, Error> {
    let deleted = connection
        .prepare(&format!(
            "DELETE FROM expense WHERE id = :id RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(&[(":id", &id)], map_expense_row)
        .optional()?;

    if deleted.is_some() {
        tracing::debug!("Deleted expense {id}");
    }

    Ok(deleted)
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// `AUTOINCREMENT` guarantees that the IDs of deleted expenses are never reused.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 120),
                amount TEXT NOT NULL,
                currency TEXT NOT NULL CHECK (length(currency) = 3),
                category TEXT NOT NULL CHECK (length(category) BETWEEN 1 AND 50),
                note TEXT,
                spent_at TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Used by the date range filters on listing, reports and exports.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_spent_at ON expense(spent_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
///
/// The row must contain the expense columns in table order.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        category: row.get(4)?,
        note: row.get(5)?,
        spent_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

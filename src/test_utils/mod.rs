#![allow(missing_docs)]

pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Expense, NewExpense, db::initialize};

pub(crate) use http::{assert_content_type, must_parse_json};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&connection).expect("could not initialize test DB");

    connection
}

pub(crate) fn must_create_shared_test_connection() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(must_create_test_connection()))
}

/// An expense in US dollars with `amount` given as a decimal string, e.g. "10.50".
#[track_caller]
pub(crate) fn new_test_expense(
    title: &str,
    amount: &str,
    category: &str,
    spent_at: OffsetDateTime,
) -> NewExpense {
    Expense::build(
        title,
        amount.parse().expect("invalid test amount"),
        "USD",
        category,
        spent_at,
    )
}

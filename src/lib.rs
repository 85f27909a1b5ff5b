//! Wallet is a small REST service for keeping track of personal expenses.
//!
//! This library provides a JSON API for recording expenses, summarising
//! them over a date range and exporting them as CSV or JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod export;
mod extract;
mod logging;
mod pagination;
mod report;
mod routing;
mod timestamp;

#[cfg(test)]
mod test_utils;

pub use amount::Amount;
pub use app_state::AppState;
pub use database_id::ExpenseId;
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseUpdate, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Store functions report a missing expense as `Ok(None)`, so this error
    /// is mostly produced by request handlers and by queries that expected
    /// exactly one row.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A field in a request failed validation.
    ///
    /// The string is shown to the client and should say which field was
    /// invalid and why.
    #[error("{0}")]
    Validation(String),

    /// A timestamp could not be parsed as an RFC 3339 date-time, a naive
    /// date-time or a date.
    #[error("\"{0}\" is not a valid date or date-time")]
    InvalidTimestamp(String),

    /// An amount was zero, negative or had more precision than can be stored.
    #[error("invalid amount {0}: {1}")]
    InvalidAmount(String, &'static str),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The export could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Expense not found".to_owned()),
            Error::Validation(_) | Error::InvalidTimestamp(_) | Error::InvalidAmount(_, _) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expense_endpoint, list_expenses_endpoint,
    },
    export::export_endpoint,
    report::{get_chart_endpoint, get_summary_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .patch(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::EXPENSE_CHART, get(get_chart_endpoint))
        .route(endpoints::EXPORT, get(export_endpoint))
        .route(endpoints::ABOUT, get(get_about))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// A description of the service.
#[derive(Debug, Serialize)]
struct About {
    name: &'static str,
    version: &'static str,
    description: &'static str,
}

async fn get_about() -> Json<About> {
    Json(About {
        name: "Wallet",
        version: env!("CARGO_PKG_VERSION"),
        description: "A minimal but production-minded Wallet (expense tracker) REST service.",
    })
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response()
}

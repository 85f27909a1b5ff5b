//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}', use [format_endpoint].

/// The route to create and list expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to get, edit or delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for summarising expenses over a date range.
pub const SUMMARY: &str = "/reports/summary";
/// The route for chart data of expenses over a date range.
pub const EXPENSE_CHART: &str = "/charts/expenses";
/// The route for exporting expenses as CSV or JSON.
pub const EXPORT: &str = "/export";
/// The route describing the service.
pub const ABOUT: &str = "/about";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

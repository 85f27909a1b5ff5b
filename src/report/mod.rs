//! Reports module
//!
//! Summarises expenses over a date range, grouped by day, month or category,
//! either as totals per group or as a sorted series for charting.

mod aggregation;
mod chart;
mod query;
mod request;
mod summary;

pub use chart::get_chart_endpoint;
pub use request::{GroupBy, ReportParams, ReportState};
pub use summary::get_summary_endpoint;

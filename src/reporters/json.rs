//! JSON reporter
//!
//! Outputs the full GateReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use super::GateReport;
use crate::models::{AggregateResult, Category};
use anyhow::Result;

/// Serialize a report; also used for the report file
pub(super) fn to_json(report: &GateReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render report as JSON
pub fn render(report: &GateReport) -> Result<String> {
    Ok(to_json(report)?)
}

/// Render the repository score, or a single category result
pub fn render_scores(aggregate: &AggregateResult, only: Option<Category>) -> Result<String> {
    Ok(match only {
        Some(category) => serde_json::to_string_pretty(aggregate.category(category))?,
        None => serde_json::to_string_pretty(aggregate)?,
    })
}

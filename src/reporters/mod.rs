//! Output reporters for gate results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown
//!
//! The JSON and Markdown renderings double as the report files written by
//! [`write_reports`].

mod json;
mod markdown;
mod text;

use crate::error::{GateError, GateResult};
use crate::models::{AggregateResult, Category, PipelineDecision, ProjectTestResult};
use crate::pipeline::PipelineOutcome;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Quality gate threshold and where the score landed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityGateSummary {
    pub threshold: u8,
    pub actual: f64,
    pub passed: bool,
}

/// Category rates and the overall score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub compatibility: f64,
    pub standards: f64,
    pub security: f64,
    pub overall: f64,
}

/// Project test availability and result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTestsSummary {
    pub available: bool,
    pub result: ProjectTestResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The persisted record of one gate run
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub timestamp: DateTime<Local>,
    pub project_path: PathBuf,
    pub quality_gate: QualityGateSummary,
    pub scores: ScoreSummary,
    pub recommendation: String,
    pub project_tests: ProjectTestsSummary,
    pub can_deploy: bool,
    pub critical_issues: Vec<String>,
    pub warnings: Vec<String>,
    /// Per-category results backing the summary
    pub details: AggregateResult,
}

impl GateReport {
    pub fn new(outcome: &PipelineOutcome) -> Self {
        Self::at(outcome, Local::now())
    }

    pub fn at(outcome: &PipelineOutcome, timestamp: DateTime<Local>) -> Self {
        let aggregate = &outcome.aggregate;
        let decision: &PipelineDecision = &outcome.decision;
        Self {
            timestamp,
            project_path: outcome.project_path.clone(),
            quality_gate: QualityGateSummary {
                threshold: outcome.minimum_score,
                actual: aggregate.overall_score,
                passed: aggregate.overall_score >= f64::from(outcome.minimum_score),
            },
            scores: ScoreSummary::from(aggregate),
            recommendation: aggregate.recommendation.label().to_string(),
            project_tests: ProjectTestsSummary {
                available: outcome.project_tests.runner.is_some(),
                result: outcome.project_tests.result,
                runner: outcome.project_tests.runner.clone(),
                detail: outcome.project_tests.detail.clone(),
            },
            can_deploy: decision.can_deploy,
            critical_issues: decision.critical_issues.clone(),
            warnings: decision.warnings.clone(),
            details: aggregate.clone(),
        }
    }

    /// `quality-report-<timestamp>` without extension
    pub fn file_stem(&self) -> String {
        format!("quality-report-{}", self.timestamp.format("%Y%m%d-%H%M%S"))
    }
}

impl From<&AggregateResult> for ScoreSummary {
    fn from(aggregate: &AggregateResult) -> Self {
        Self {
            compatibility: aggregate.compatibility.rate,
            standards: aggregate.standards.rate,
            security: aggregate.security.rate,
            overall: aggregate.overall_score,
        }
    }
}

/// Render a gate report using an OutputFormat enum
pub fn report_with_format(report: &GateReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Render a repository score without a decision, optionally one category only
pub fn scores_with_format(
    aggregate: &AggregateResult,
    only: Option<Category>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_scores(aggregate, only),
        OutputFormat::Json => json::render_scores(aggregate, only),
        OutputFormat::Markdown => markdown::render_scores(aggregate, only),
    }
}

/// Write the JSON record and the Markdown summary into `dir`.
///
/// Returns the two paths, JSON first.
pub fn write_reports(dir: &Path, report: &GateReport) -> GateResult<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir).map_err(|source| GateError::ReportWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let stem = report.file_stem();
    let json_path = dir.join(format!("{}.json", stem));
    let md_path = dir.join(format!("{}.md", stem));

    let record = json::to_json(report).map_err(|e| GateError::ReportWrite {
        path: json_path.clone(),
        source: e.into(),
    })?;
    write_file(&json_path, &record)?;
    write_file(&md_path, &markdown::summary(report))?;

    info!("Reports written to {} and {}", json_path.display(), md_path.display());
    Ok((json_path, md_path))
}

fn write_file(path: &Path, contents: &str) -> GateResult<()> {
    std::fs::write(path, contents).map_err(|source| GateError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

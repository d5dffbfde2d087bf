//! Text (terminal) reporter with colors and formatting
//!
//! Colors come from `console` and follow its global switch, so `--no-color`
//! and non-terminal output render plain text.

use super::GateReport;
use crate::models::{AggregateResult, Category, CategoryResult, ProjectTestResult, Severity};
use anyhow::Result;
use console::style;

/// Files listed per category before truncating
const MAX_FILES: usize = 10;

/// Severity tag
fn severity_tag(severity: Severity) -> String {
    let tag = match severity {
        Severity::Critical => "[C]",
        Severity::High => "[H]",
        Severity::Medium => "[M]",
        Severity::Low => "[L]",
        Severity::Info => "[I]",
    };
    match severity {
        Severity::Critical => style(tag).red().bold().to_string(),
        Severity::High => style(tag).red().to_string(),
        Severity::Medium => style(tag).yellow().to_string(),
        Severity::Low => style(tag).blue().to_string(),
        Severity::Info => style(tag).dim().to_string(),
    }
}

/// Render report as formatted terminal output
pub fn render(report: &GateReport) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{}\n", style("Quality Gate").bold()));
    out.push_str(&format!("{}\n", style("──────────────────────────────────────").dim()));
    out.push_str(&format!(
        "Score: {}  Minimum: {}  Files: {}\n",
        style(format!("{:.2}/100", report.scores.overall)).bold(),
        report.quality_gate.threshold,
        report.details.compatibility.tested_files.len()
    ));
    out.push_str(&format!("{}\n\n", recommendation_line(&report.recommendation)));

    out.push_str(&render_score_lines(&report.details));
    out.push('\n');

    out.push_str(&format!("{}\n", style("PROJECT TESTS").bold()));
    let result = match report.project_tests.result {
        ProjectTestResult::Passed => style("passed").green().to_string(),
        ProjectTestResult::Failed => style("failed").red().to_string(),
        ProjectTestResult::Skipped => style("skipped").yellow().to_string(),
    };
    match &report.project_tests.runner {
        Some(runner) => out.push_str(&format!("  {}  {}\n", result, style(runner).dim())),
        None => out.push_str(&format!("  {}\n", result)),
    }
    out.push('\n');

    for issue in &report.critical_issues {
        out.push_str(&format!("{} {}\n", style("✗").red().bold(), issue));
    }
    for warning in &report.warnings {
        out.push_str(&format!("{} {}\n", style("!").yellow().bold(), warning));
    }

    let verdict = if report.can_deploy {
        style("DEPLOY").green().bold()
    } else {
        style("DO NOT DEPLOY").red().bold()
    };
    out.push_str(&format!("\nDecision: {}\n", verdict));

    Ok(out)
}

/// Render the repository score without a decision
pub fn render_scores(aggregate: &AggregateResult, only: Option<Category>) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", style("Repository Score").bold()));
    out.push_str(&format!(
        "Score: {}\n",
        style(format!("{:.2}/100", aggregate.overall_score)).bold()
    ));
    out.push_str(&format!("{}\n\n", recommendation_line(aggregate.recommendation.label())));
    out.push_str(&render_score_lines(aggregate));

    for category in Category::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        out.push_str(&render_category(aggregate.category(category)));
    }
    Ok(out)
}

fn recommendation_line(label: &str) -> String {
    if label.starts_with("Critical") || label.starts_with("Fail") {
        style(label).red().to_string()
    } else if label.starts_with("Excellent") {
        style(label).green().to_string()
    } else {
        style(label).yellow().to_string()
    }
}

fn render_score_lines(aggregate: &AggregateResult) -> String {
    let mut out = format!("{}\n", style("SCORES").bold());
    for category in Category::ALL {
        let result = aggregate.category(category);
        out.push_str(&format!(
            "  {:<14} {}  {}\n",
            category.title(),
            format_score(result.rate),
            style(format!(
                "{}/{} files passed",
                result.passed_files.len(),
                result.tested_files.len()
            ))
            .dim()
        ));
    }
    out
}

fn render_category(result: &CategoryResult) -> String {
    if result.issues.is_empty() && result.sub_checks.is_empty() {
        return String::new();
    }

    let mut out = format!("\n{}\n", style(result.category.title().to_uppercase()).bold());
    for check in &result.sub_checks {
        out.push_str(&format!("  {:<24} {}\n", check.name, format_score(check.rate)));
    }

    for (path, issues) in result.issues.iter().take(MAX_FILES) {
        out.push_str(&format!("  {}\n", style(path.display()).dim()));
        for issue in issues {
            out.push_str(&format!("    {} {}\n", severity_tag(issue.severity), issue.rule));
        }
    }

    let remaining = result.issues.len().saturating_sub(MAX_FILES);
    if remaining > 0 {
        out.push_str(&format!(
            "  {}\n",
            style(format!("...and {} more files (use --format json)", remaining)).dim()
        ));
    }
    out
}

/// Format score with color
fn format_score(score: f64) -> String {
    let text = format!("{:>6.2}", score);
    if score >= 90.0 {
        style(text).green().to_string()
    } else if score >= 75.0 {
        style(text).yellow().to_string()
    } else {
        style(text).red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    #[test]
    fn test_text_render_contains_decision() {
        let out = plain(&render(&test_report()).expect("render text"));
        assert!(out.contains("Score: 85.00/100  Minimum: 90  Files: 2"));
        assert!(out.contains("Critical — security issues must be resolved"));
        assert!(out.contains("✗ Critical security issues detected"));
        assert!(out.contains("! Project tests skipped"));
        assert!(out.contains("Decision: DO NOT DEPLOY"));
    }

    #[test]
    fn test_text_scores_lists_issues() {
        let report = test_report();
        let out = plain(&render_scores(&report.details, None).expect("render"));
        assert!(out.contains("Standards"));
        assert!(out.contains(" 87.50"));
        assert!(out.contains("[C] PlaintextPassword"));
        assert!(out.contains("[M] CommentBasedHelp"));
    }

    #[test]
    fn test_text_scores_filters_category() {
        let report = test_report();
        let out = plain(&render_scores(&report.details, Some(Category::Standards)).expect("render"));
        assert!(out.contains("[M] CommentBasedHelp"));
        assert!(!out.contains("PlaintextPassword"));
    }
}

//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates the human-readable summary written next to the JSON record,
//! also suitable for pull request comments and CI job summaries.

use super::GateReport;
use crate::models::{AggregateResult, Category, CategoryResult};
use anyhow::Result;

/// Maximum files listed per category
const MAX_FILES_PER_CATEGORY: usize = 20;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &GateReport) -> Result<String> {
    Ok(summary(report))
}

/// Render the repository score without a decision
pub fn render_scores(aggregate: &AggregateResult, only: Option<Category>) -> Result<String> {
    let mut md = String::from("# Repository Score\n\n");
    md.push_str(&render_category_scores(aggregate));
    md.push('\n');
    md.push_str(&render_details(aggregate, only));
    Ok(md)
}

/// Full Markdown summary of a gate run
pub(super) fn summary(report: &GateReport) -> String {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_decision(report));
    md.push('\n');

    md.push_str(&render_category_scores(&report.details));
    md.push('\n');

    md.push_str(&render_project_tests(report));
    md.push('\n');

    md.push_str(&render_details(&report.details, None));

    md
}

fn render_header(report: &GateReport) -> String {
    let verdict = if report.can_deploy { "✅ Deploy" } else { "❌ Do not deploy" };

    format!(
        r#"# Quality Gate Report

**{}** | **Score: {:.2}/100** | {}

- Project: `{}`
- Generated: {}
"#,
        verdict,
        report.scores.overall,
        report.recommendation,
        report.project_path.display(),
        report.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

fn render_decision(report: &GateReport) -> String {
    let gate = &report.quality_gate;
    let mut md = format!(
        r#"## Decision

| Check | Value |
|-------|-------|
| **Quality Gate** | {} (minimum {}, actual {:.2}) |
| **Can Deploy** | {} |
"#,
        if gate.passed { "passed" } else { "failed" },
        gate.threshold,
        gate.actual,
        if report.can_deploy { "yes" } else { "no" }
    );

    if !report.critical_issues.is_empty() {
        md.push_str("\n### Critical Issues\n\n");
        for issue in &report.critical_issues {
            md.push_str(&format!("- 🔴 {}\n", issue));
        }
    }
    if !report.warnings.is_empty() {
        md.push_str("\n### Warnings\n\n");
        for warning in &report.warnings {
            md.push_str(&format!("- 🟡 {}\n", warning));
        }
    }
    md
}

fn render_category_scores(aggregate: &AggregateResult) -> String {
    let mut md = String::from(
        "## Category Scores\n\n| Category | Weight | Rate | Passed | Status |\n|----------|--------|------|--------|--------|\n",
    );
    for (category, weight) in [
        (Category::Compatibility, crate::scoring::COMPATIBILITY_WEIGHT),
        (Category::Standards, crate::scoring::STANDARDS_WEIGHT),
        (Category::Security, crate::scoring::SECURITY_WEIGHT),
    ] {
        let result = aggregate.category(category);
        md.push_str(&format!(
            "| {} | {:.0}% | {:.2} | {}/{} | {} |\n",
            category.title(),
            weight * 100.0,
            result.rate,
            result.passed_files.len(),
            result.tested_files.len(),
            score_indicator(result.rate)
        ));
    }
    md.push_str(&format!(
        "| **Overall** | | **{:.2}** | | {} |\n",
        aggregate.overall_score, aggregate.recommendation
    ));
    md
}

fn render_project_tests(report: &GateReport) -> String {
    let tests = &report.project_tests;
    let mut md = format!(
        "## Project Tests\n\n- Available: {}\n- Result: {}\n",
        if tests.available { "yes" } else { "no" },
        tests.result
    );
    if let Some(runner) = &tests.runner {
        md.push_str(&format!("- Runner: `{}`\n", runner));
    }
    if let Some(detail) = &tests.detail {
        md.push_str(&format!("- Detail: {}\n", detail));
    }
    md
}

fn render_details(aggregate: &AggregateResult, only: Option<Category>) -> String {
    let mut md = String::from("## Details\n");
    for category in Category::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        md.push_str(&render_category(aggregate.category(category)));
    }
    md
}

fn render_category(result: &CategoryResult) -> String {
    let mut md = format!("\n### {}\n\n", result.category.title());

    for check in &result.sub_checks {
        md.push_str(&format!("- {}: {:.2}%\n", check.name, check.rate));
    }
    if !result.sub_checks.is_empty() {
        md.push('\n');
    }

    if result.issues.is_empty() {
        md.push_str("No issues.\n");
    } else {
        md.push_str("| File | Issues |\n|------|--------|\n");
        for (path, issues) in result.issues.iter().take(MAX_FILES_PER_CATEGORY) {
            let list: Vec<String> = issues
                .iter()
                .map(|i| format!("{} ({})", i.rule, i.severity))
                .collect();
            md.push_str(&format!("| `{}` | {} |\n", path.display(), list.join(", ")));
        }
        let remaining = result.issues.len().saturating_sub(MAX_FILES_PER_CATEGORY);
        if remaining > 0 {
            md.push_str(&format!("\n*...and {} more files*\n", remaining));
        }
    }

    if !result.defensive_patterns.is_empty() {
        md.push_str(&format!(
            "\nDefensive patterns found in {} files (informational).\n",
            result.defensive_patterns.len()
        ));
    }
    if !result.skipped_files.is_empty() {
        md.push_str(&format!(
            "\n{} unreadable files were skipped.\n",
            result.skipped_files.len()
        ));
    }
    md
}

fn score_indicator(score: f64) -> &'static str {
    if score >= 90.0 {
        "🟢"
    } else if score >= 75.0 {
        "🟡"
    } else if score >= 50.0 {
        "🟠"
    } else {
        "🔴"
    }
}

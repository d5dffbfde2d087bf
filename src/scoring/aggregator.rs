use crate::models::{AggregateResult, CategoryResult, Recommendation};
use tracing::info;

pub const COMPATIBILITY_WEIGHT: f64 = 0.4;
pub const STANDARDS_WEIGHT: f64 = 0.4;
pub const SECURITY_WEIGHT: f64 = 0.2;

/// Round to two decimals, ties to even (banker's rounding)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Recommendation band for a score. The critical flag wins over any score.
pub fn recommend(overall_score: f64, has_critical_security_issues: bool) -> Recommendation {
    if has_critical_security_issues {
        Recommendation::Critical
    } else if overall_score >= 90.0 {
        Recommendation::Excellent
    } else if overall_score >= 75.0 {
        Recommendation::Good
    } else if overall_score >= 50.0 {
        Recommendation::Fair
    } else {
        Recommendation::Fail
    }
}

/// Combine the three category results.
///
/// Pure: the same inputs always give the same output.
pub fn aggregate(
    compatibility: CategoryResult,
    standards: CategoryResult,
    security: CategoryResult,
) -> AggregateResult {
    let weighted = compatibility.rate * COMPATIBILITY_WEIGHT
        + standards.rate * STANDARDS_WEIGHT
        + security.rate * SECURITY_WEIGHT;
    let overall_score = round2(weighted).clamp(0.0, 100.0);
    let has_critical_security_issues = security.has_critical_issues;
    let recommendation = recommend(overall_score, has_critical_security_issues);

    info!(
        "Overall score: {:.2} ({}) - Compatibility: {:.2}, Standards: {:.2}, Security: {:.2}",
        overall_score, recommendation, compatibility.rate, standards.rate, security.rate
    );

    AggregateResult {
        compatibility,
        standards,
        security,
        overall_score,
        recommendation,
        has_critical_security_issues,
    }
}

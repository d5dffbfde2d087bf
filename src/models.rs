//! Core data models for scriptgate
//!
//! These models carry results from the analyzers through the aggregator to
//! the decision pipeline and the reporters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Severity levels for rules and issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// An independent scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Compatibility,
    Standards,
    Security,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Compatibility,
        Category::Standards,
        Category::Security,
    ];

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Category::Compatibility => "Compatibility",
            Category::Standards => "Standards",
            Category::Security => "Security",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Compatibility => write!(f, "compatibility"),
            Category::Standards => write!(f, "standards"),
            Category::Security => write!(f, "security"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compatibility" | "compat" => Ok(Category::Compatibility),
            "standards" => Ok(Category::Standards),
            "security" => Ok(Category::Security),
            _ => Err(anyhow::anyhow!(
                "Unknown category '{}'. Valid categories: compatibility, standards, security",
                s
            )),
        }
    }
}

/// A single rule hit (or a missed sub-check for standards) on one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: String,
    pub severity: Severity,
}

/// Pass set for one standards sub-check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCheckResult {
    pub name: String,
    pub passed_files: BTreeSet<PathBuf>,
    pub rate: f64,
}

/// Outcome of one category analyzer over one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    /// Files whose content was evaluated, in scan order
    pub tested_files: Vec<PathBuf>,
    pub passed_files: BTreeSet<PathBuf>,
    /// Rule hits per file, in catalog order
    pub issues: BTreeMap<PathBuf, Vec<Issue>>,
    /// Pass rate, 0-100
    pub rate: f64,
    /// Sticky flag: any critical security rule matched during the scan
    #[serde(default)]
    pub has_critical_issues: bool,
    /// Files that could not be read and were left out of scoring
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<PathBuf>,
    /// Compatibility only: defensive patterns seen per file (not scored)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defensive_patterns: BTreeMap<PathBuf, Vec<String>>,
    /// Standards only: one entry per sub-check
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_checks: Vec<SubCheckResult>,
}

impl CategoryResult {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            tested_files: Vec::new(),
            passed_files: BTreeSet::new(),
            issues: BTreeMap::new(),
            rate: 100.0,
            has_critical_issues: false,
            skipped_files: Vec::new(),
            defensive_patterns: BTreeMap::new(),
            sub_checks: Vec::new(),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.tested_files.len() - self.passed_files.len()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }
}

/// Qualitative band attached to an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Critical,
    Excellent,
    Good,
    Fair,
    Fail,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Critical => "Critical — security issues must be resolved",
            Recommendation::Excellent => "Excellent — ready for deployment",
            Recommendation::Good => "Good — minor improvements recommended",
            Recommendation::Fair => "Fair — significant improvements needed",
            Recommendation::Fail => "Fail — major refactoring required",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Combined result of the three analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub compatibility: CategoryResult,
    pub standards: CategoryResult,
    pub security: CategoryResult,
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub has_critical_security_issues: bool,
}

impl AggregateResult {
    pub fn category(&self, category: Category) -> &CategoryResult {
        match category {
            Category::Compatibility => &self.compatibility,
            Category::Standards => &self.standards,
            Category::Security => &self.security,
        }
    }
}

/// Outcome of the project-level test stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTestResult {
    Passed,
    Failed,
    Skipped,
}

impl std::fmt::Display for ProjectTestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectTestResult::Passed => write!(f, "passed"),
            ProjectTestResult::Failed => write!(f, "failed"),
            ProjectTestResult::Skipped => write!(f, "skipped"),
        }
    }
}

/// Final deploy / no-deploy verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDecision {
    pub can_deploy: bool,
    pub critical_issues: Vec<String>,
    pub warnings: Vec<String>,
    pub project_test_result: ProjectTestResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(Category::from_str("Security").unwrap(), Category::Security);
        assert_eq!(Category::from_str("compat").unwrap(), Category::Compatibility);
        assert!(Category::from_str("style").is_err());
    }

    #[test]
    fn test_new_category_result_is_vacuously_perfect() {
        let result = CategoryResult::new(Category::Standards);
        assert_eq!(result.rate, 100.0);
        assert_eq!(result.failed_count(), 0);
        assert!(!result.has_critical_issues);
    }

    #[test]
    fn test_recommendation_serializes_lowercase() {
        let json = serde_json::to_string(&Recommendation::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        assert!(Recommendation::Critical.label().starts_with("Critical"));
    }
}

//! Category analyzers
//!
//! Each analyzer takes the scanned files and its slice of the rule catalog
//! and produces a [`CategoryResult`]:
//! - `compatibility` - PowerShell 7+ syntax that breaks on 5.1
//! - `standards` - documentation, error handling, logging, typed output
//! - `security` - secrets and dangerous execution patterns
//!
//! Analyzers never fail on a single file. Files without content are left out
//! of both the pass and fail buckets and listed in `skipped_files`.

mod compatibility;
mod security;
mod standards;

pub use compatibility::CompatibilityAnalyzer;
pub use security::SecurityAnalyzer;
pub use standards::StandardsAnalyzer;

use crate::error::GateResult;
use crate::models::{Category, CategoryResult, Issue};
use crate::rules::{Rule, RuleCatalog, RuleRole};
use crate::scanner::{scan, FileRecord, ScanOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Trait implemented by the three category analyzers
pub trait CategoryAnalyzer: Send + Sync {
    /// Category this analyzer scores
    fn category(&self) -> Category;

    /// Score already-scanned files
    fn analyze_files(&self, files: &[FileRecord]) -> CategoryResult;

    /// Scan `path` and score the result.
    ///
    /// Fails only when `path` does not exist.
    fn analyze(&self, path: &Path, recursive: bool) -> GateResult<CategoryResult> {
        let options = ScanOptions::default().recursive(recursive);
        let files = scan(path, &options)?;
        Ok(self.analyze_files(&files))
    }
}

/// The three analyzers sharing one catalog
pub struct Analyzers {
    pub compatibility: CompatibilityAnalyzer,
    pub standards: StandardsAnalyzer,
    pub security: SecurityAnalyzer,
}

impl Analyzers {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            compatibility: CompatibilityAnalyzer::new(Arc::clone(&catalog)),
            standards: StandardsAnalyzer::new(Arc::clone(&catalog)),
            security: SecurityAnalyzer::new(catalog),
        }
    }

    /// Run all three analyzers over the same files.
    ///
    /// The analyzers only read `files` and each builds its own result, so
    /// they run in parallel and are joined in a fixed order.
    pub fn analyze_all(&self, files: &[FileRecord]) -> (CategoryResult, CategoryResult, CategoryResult) {
        let (compatibility, (standards, security)) = rayon::join(
            || self.compatibility.analyze_files(files),
            || {
                rayon::join(
                    || self.standards.analyze_files(files),
                    || self.security.analyze_files(files),
                )
            },
        );

        for result in [&compatibility, &standards, &security] {
            info!(
                "{}: {}/{} files passed ({:.2}%)",
                result.category.title(),
                result.passed_files.len(),
                result.tested_files.len(),
                result.rate
            );
        }

        (compatibility, standards, security)
    }
}

/// `passed / tested * 100`, or 100 when nothing was tested
pub fn pass_rate(passed: usize, tested: usize) -> f64 {
    if tested == 0 {
        100.0
    } else {
        passed as f64 / tested as f64 * 100.0
    }
}

impl Rule {
    /// Whether `content` breaks this rule: a disqualifying pattern matched or
    /// a required marker is missing. Informational rules are never violated.
    pub fn is_violated_by(&self, content: &str) -> bool {
        match self.role {
            RuleRole::Disqualifying => self.is_match(content),
            RuleRole::Required => !self.is_match(content),
            RuleRole::Informational => false,
        }
    }

    fn issue(&self) -> Issue {
        Issue {
            rule: self.name.clone(),
            severity: self.severity,
        }
    }
}

/// Scored (non-informational) rules of a category, in catalog order
fn scored_rules(catalog: &RuleCatalog, category: Category) -> Vec<&Rule> {
    catalog
        .for_category(category)
        .filter(|r| r.role != RuleRole::Informational)
        .collect()
}

/// Shared pass/fail evaluation: a file fails when any scored rule is violated.
///
/// `on_file` sees every readable file and the issues it produced, which lets
/// the caller collect category-specific signals in the same pass.
fn evaluate_pass_fail<F>(
    category: Category,
    rules: &[&Rule],
    files: &[FileRecord],
    mut on_file: F,
) -> CategoryResult
where
    F: FnMut(&mut CategoryResult, &FileRecord, &str, &[Issue]),
{
    let mut result = CategoryResult::new(category);

    for file in files {
        let Some(content) = file.content.as_deref() else {
            result.skipped_files.push(file.path.clone());
            continue;
        };
        result.tested_files.push(file.path.clone());

        let issues: Vec<Issue> = rules
            .iter()
            .filter(|r| r.is_violated_by(content))
            .map(|r| r.issue())
            .collect();

        on_file(&mut result, file, content, &issues);

        if issues.is_empty() {
            result.passed_files.insert(file.path.clone());
        } else {
            tracing::debug!(
                "{} [{}]: {}",
                file.path.display(),
                category,
                issues.iter().map(|i| i.rule.as_str()).collect::<Vec<_>>().join(", ")
            );
            result.issues.insert(file.path.clone(), issues);
        }
    }

    result.rate = pass_rate(result.passed_files.len(), result.tested_files.len());
    result
}

//! Security analyzer
//!
//! A file passes when no security rule matches it. Any critical match sets
//! `has_critical_issues` for the whole scan, which blocks deployment
//! regardless of the rate.

use super::{evaluate_pass_fail, scored_rules, CategoryAnalyzer};
use crate::models::{Category, CategoryResult, Severity};
use crate::rules::RuleCatalog;
use crate::scanner::FileRecord;
use std::sync::Arc;
use tracing::warn;

pub struct SecurityAnalyzer {
    catalog: Arc<RuleCatalog>,
}

impl SecurityAnalyzer {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }
}

impl CategoryAnalyzer for SecurityAnalyzer {
    fn category(&self) -> Category {
        Category::Security
    }

    fn analyze_files(&self, files: &[FileRecord]) -> CategoryResult {
        let rules = scored_rules(&self.catalog, Category::Security);

        evaluate_pass_fail(Category::Security, &rules, files, |result, file, _, issues| {
            for issue in issues.iter().filter(|i| i.severity == Severity::Critical) {
                warn!("Critical security issue {} in {}", issue.rule, file.path.display());
                result.has_critical_issues = true;
            }
        })
    }
}

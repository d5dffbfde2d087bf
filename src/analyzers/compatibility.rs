//! Compatibility analyzer
//!
//! A file passes unless it uses syntax the older runtime cannot handle. No
//! positive evidence is needed, so an empty file passes. Defensive patterns
//! are recorded per file and do not move the rate.

use super::{evaluate_pass_fail, scored_rules, CategoryAnalyzer};
use crate::models::{Category, CategoryResult};
use crate::rules::{RuleCatalog, RuleRole};
use crate::scanner::FileRecord;
use std::sync::Arc;

pub struct CompatibilityAnalyzer {
    catalog: Arc<RuleCatalog>,
}

impl CompatibilityAnalyzer {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }
}

impl CategoryAnalyzer for CompatibilityAnalyzer {
    fn category(&self) -> Category {
        Category::Compatibility
    }

    fn analyze_files(&self, files: &[FileRecord]) -> CategoryResult {
        let rules = scored_rules(&self.catalog, Category::Compatibility);
        let defensive: Vec<_> = self
            .catalog
            .with_role(Category::Compatibility, RuleRole::Informational)
            .collect();

        evaluate_pass_fail(Category::Compatibility, &rules, files, |result, file, content, _| {
            let seen: Vec<String> = defensive
                .iter()
                .filter(|r| r.is_match(content))
                .map(|r| r.name.clone())
                .collect();
            if !seen.is_empty() {
                result.defensive_patterns.insert(file.path.clone(), seen);
            }
        })
    }
}

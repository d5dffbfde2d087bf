//! Standards analyzer
//!
//! Each scored standards rule is a sub-check with its own pass set. The
//! category rate is the mean of the sub-check rates, so a file that misses
//! one marker only costs that sub-check. `passed_files` holds the files that
//! pass every sub-check and `issues` lists the sub-checks each file missed.

use super::{pass_rate, scored_rules, CategoryAnalyzer};
use crate::models::{Category, CategoryResult, SubCheckResult};
use crate::rules::RuleCatalog;
use crate::scanner::FileRecord;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub struct StandardsAnalyzer {
    catalog: Arc<RuleCatalog>,
}

impl StandardsAnalyzer {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }
}

impl CategoryAnalyzer for StandardsAnalyzer {
    fn category(&self) -> Category {
        Category::Standards
    }

    fn analyze_files(&self, files: &[FileRecord]) -> CategoryResult {
        let rules = scored_rules(&self.catalog, Category::Standards);
        let mut result = CategoryResult::new(Category::Standards);
        let mut sub_checks: Vec<SubCheckResult> = rules
            .iter()
            .map(|r| SubCheckResult {
                name: r.name.clone(),
                passed_files: BTreeSet::new(),
                rate: 100.0,
            })
            .collect();

        for file in files {
            let Some(content) = file.content.as_deref() else {
                result.skipped_files.push(file.path.clone());
                continue;
            };
            result.tested_files.push(file.path.clone());

            let mut missed = Vec::new();
            for (rule, check) in rules.iter().zip(sub_checks.iter_mut()) {
                if rule.is_violated_by(content) {
                    missed.push(rule.issue());
                } else {
                    check.passed_files.insert(file.path.clone());
                }
            }

            if missed.is_empty() {
                result.passed_files.insert(file.path.clone());
            } else {
                debug!(
                    "{} missing standards: {}",
                    file.path.display(),
                    missed.iter().map(|i| i.rule.as_str()).collect::<Vec<_>>().join(", ")
                );
                result.issues.insert(file.path.clone(), missed);
            }
        }

        let tested = result.tested_files.len();
        for check in &mut sub_checks {
            check.rate = pass_rate(check.passed_files.len(), tested);
        }

        result.rate = if sub_checks.is_empty() {
            100.0
        } else {
            sub_checks.iter().map(|c| c.rate).sum::<f64>() / sub_checks.len() as f64
        };
        result.sub_checks = sub_checks;
        result
    }
}

//! Rule catalog
//!
//! Every detection pattern lives here as a typed [`Rule`]. The built-in
//! tables are compiled once into a [`RuleCatalog`], optionally adjusted by the
//! project config (disabled rules, custom rules), and then shared read-only
//! with the analyzers.
//!
//! Patterns are matched against the whole file content, so a rule counts at
//! most once per file no matter how often it matches.

mod compatibility;
mod security;
mod standards;

use crate::config::RulesConfig;
use crate::error::{GateError, GateResult};
use crate::models::{Category, Severity};
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// How a rule match affects the file that triggered it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleRole {
    /// A match fails the file for its category
    Disqualifying,
    /// A match is required for the file to pass this sub-check
    Required,
    /// Recorded per file, never scored
    Informational,
}

impl std::fmt::Display for RuleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleRole::Disqualifying => write!(f, "disqualifying"),
            RuleRole::Required => write!(f, "required"),
            RuleRole::Informational => write!(f, "informational"),
        }
    }
}

/// Static definition used by the built-in tables
pub(crate) struct RuleDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub severity: Severity,
    pub role: RuleRole,
    pub description: &'static str,
}

/// A compiled detection rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Regex,
    pub severity: Severity,
    pub category: Category,
    pub role: RuleRole,
    pub description: String,
}

impl Rule {
    /// Compile a rule, failing fast on an invalid pattern.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        severity: Severity,
        category: Category,
        role: RuleRole,
        description: impl Into<String>,
    ) -> GateResult<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| GateError::InvalidRule {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            pattern,
            severity,
            category,
            role,
            description: description.into(),
        })
    }

    fn from_def(def: &RuleDef, category: Category) -> GateResult<Self> {
        Self::new(
            def.name,
            def.pattern,
            def.severity,
            category,
            def.role,
            def.description,
        )
    }

    /// Whether the pattern matches anywhere in `content`
    pub fn is_match(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Rule", 6)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("pattern", self.pattern.as_str())?;
        s.serialize_field("severity", &self.severity)?;
        s.serialize_field("category", &self.category)?;
        s.serialize_field("role", &self.role)?;
        s.serialize_field("description", &self.description)?;
        s.end()
    }
}

/// Ordered, immutable set of rules for all categories
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compile the built-in tables.
    pub fn builtin() -> GateResult<Self> {
        let tables: [(Category, &[RuleDef]); 3] = [
            (Category::Compatibility, compatibility::RULES),
            (Category::Standards, standards::RULES),
            (Category::Security, security::RULES),
        ];

        let mut rules = Vec::new();
        for (category, defs) in tables {
            for def in defs {
                rules.push(Rule::from_def(def, category)?);
            }
        }
        debug!("Compiled {} built-in rules", rules.len());
        Ok(Self { rules })
    }

    /// Built-in tables adjusted by the project's `[rules]` section.
    pub fn from_config(config: &RulesConfig) -> GateResult<Self> {
        let mut catalog = Self::builtin()?;

        if !config.disabled.is_empty() {
            catalog
                .rules
                .retain(|r| !config.disabled.iter().any(|d| d.eq_ignore_ascii_case(&r.name)));
        }

        for custom in &config.custom {
            let role = custom.role.unwrap_or(match custom.category {
                Category::Standards => RuleRole::Required,
                _ => RuleRole::Disqualifying,
            });
            let rule = Rule::new(
                custom.name.clone(),
                &custom.pattern,
                custom.severity,
                custom.category,
                role,
                custom.description.clone().unwrap_or_default(),
            )?;

            // A custom rule with a built-in name replaces it in place
            match catalog.rules.iter().position(|r| r.name == rule.name) {
                Some(idx) => {
                    debug!("Custom rule '{}' overrides built-in", rule.name);
                    catalog.rules[idx] = rule;
                }
                None => catalog.rules.push(rule),
            }
        }

        Ok(catalog)
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Rules of one category, in catalog order
    pub fn for_category(&self, category: Category) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    /// Rules of one category and role, in catalog order
    pub fn with_role(&self, category: Category, role: RuleRole) -> impl Iterator<Item = &Rule> {
        self.for_category(category).filter(move |r| r.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomRuleConfig;

    fn catalog() -> RuleCatalog {
        RuleCatalog::builtin().expect("built-in rules compile")
    }

    fn names_matching(catalog: &RuleCatalog, category: Category, content: &str) -> Vec<String> {
        catalog
            .for_category(category)
            .filter(|r| r.is_match(content))
            .map(|r| r.name.clone())
            .collect()
    }

    #[test]
    fn test_builtin_tables_compile() {
        let catalog = catalog();
        for category in Category::ALL {
            assert!(catalog.for_category(category).count() > 0, "{category} is empty");
        }
        assert_eq!(catalog.with_role(Category::Standards, RuleRole::Required).count(), 4);
        assert!(catalog
            .with_role(Category::Compatibility, RuleRole::Informational)
            .all(|r| r.severity == Severity::Info));
    }

    #[test]
    fn test_rule_names_unique() {
        let catalog = catalog();
        let mut names: Vec<_> = catalog.iter().map(|r| r.name.as_str()).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_modern_syntax_detected() {
        let catalog = catalog();
        let hits = names_matching(&catalog, Category::Compatibility, "$name = $env:USER ?? 'nobody'");
        assert!(hits.contains(&"NullCoalescingOperator".to_string()), "{hits:?}");

        let hits = names_matching(
            &catalog,
            Category::Compatibility,
            "$label = ($count -gt 1) ? 'items' : 'item'",
        );
        assert!(hits.contains(&"TernaryOperator".to_string()), "{hits:?}");

        let hits = names_matching(
            &catalog,
            Category::Compatibility,
            "1..10 | ForEach-Object -Parallel { $_ * 2 }",
        );
        assert!(hits.contains(&"ParallelForEach".to_string()), "{hits:?}");

        let hits = names_matching(&catalog, Category::Compatibility, "git fetch && git pull");
        assert!(hits.contains(&"PipelineChainOperator".to_string()), "{hits:?}");
    }

    #[test]
    fn test_where_object_alias_is_not_ternary() {
        let catalog = catalog();
        let content = "Get-Process | ? { $_.CPU -gt 100 } | Select-Object Name";
        let hits: Vec<_> = catalog
            .with_role(Category::Compatibility, RuleRole::Disqualifying)
            .filter(|r| r.is_match(content))
            .map(|r| r.name.clone())
            .collect();
        assert!(hits.is_empty(), "{hits:?}");
    }

    #[test]
    fn test_chain_operator_inside_strings_is_allowed() {
        let catalog = catalog();
        let rule = catalog.get("PipelineChainOperator").unwrap();

        assert!(!rule.is_match("cmd /c \"npm install && npm test\""));
        assert!(!rule.is_match("$pattern = 'a||b'"));
        assert!(!rule.is_match("# run build && deploy later"));
        assert!(!rule.is_match("Write-Output \"it's done\" # && not code"));

        assert!(rule.is_match("Write-Output 'ready' && Start-Job $job"));
        assert!(rule.is_match("$msg = \"x\"\nnpm ci || exit 1"));
        assert!(rule.is_match("Test-Path $p || New-Item $p"));
    }

    #[test]
    fn test_security_patterns() {
        let catalog = catalog();
        let hits = names_matching(&catalog, Category::Security, "$password = \"P@ssw0rd123\"");
        assert_eq!(hits, vec!["PlaintextPassword".to_string()]);
        assert_eq!(
            catalog.get("PlaintextPassword").map(|r| r.severity),
            Some(Severity::Critical)
        );

        let hits = names_matching(&catalog, Category::Security, "Invoke-Expression $command");
        assert_eq!(hits, vec!["InvokeExpression".to_string()]);

        // Interpolated values are not literals
        let hits = names_matching(&catalog, Category::Security, "$password = \"$env:DB_PASSWORD\"");
        assert!(hits.is_empty(), "{hits:?}");

        // Single-quoted strings never interpolate
        for content in [
            "$password = 'Pa$$w0rd!'",
            "$creds = @{ User = 'svc'; Password = 'hunter2' }",
            "Connect-Db -Server db01 -Password 'hunter2'",
            "Connect-Db -Secret \"hunter2\"",
        ] {
            let hits = names_matching(&catalog, Category::Security, content);
            assert_eq!(hits, vec!["PlaintextPassword".to_string()], "{content}");
        }

        for content in [
            "Connect-Db -Password $credential.Password",
            "$value = Get-Secret 'DbPassword'",
            "Connect-Db -Password \"$env:DB_PASSWORD\"",
        ] {
            let hits = names_matching(&catalog, Category::Security, content);
            assert!(hits.is_empty(), "{content}: {hits:?}");
        }
    }

    #[test]
    fn test_invalid_pattern_fails_fast() {
        let err = Rule::new(
            "Broken",
            "(unclosed",
            Severity::High,
            Category::Security,
            RuleRole::Disqualifying,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, GateError::InvalidRule { ref name, .. } if name == "Broken"));
    }

    #[test]
    fn test_config_disables_and_adds_rules() {
        let config = RulesConfig {
            disabled: vec!["psstylevariable".into()],
            custom: vec![CustomRuleConfig {
                name: "NoWriteHost".into(),
                pattern: r"(?i)\bWrite-Host\b".into(),
                severity: Severity::Low,
                category: Category::Standards,
                role: None,
                description: None,
            }],
        };
        let catalog = RuleCatalog::from_config(&config).unwrap();
        assert!(catalog.get("PSStyleVariable").is_none());
        let custom = catalog.get("NoWriteHost").expect("custom rule present");
        assert_eq!(custom.role, RuleRole::Required);
        assert_eq!(catalog.with_role(Category::Standards, RuleRole::Required).count(), 5);
    }

    #[test]
    fn test_config_with_invalid_custom_rule_errors() {
        let config = RulesConfig {
            disabled: vec![],
            custom: vec![CustomRuleConfig {
                name: "Bad".into(),
                pattern: "[".into(),
                severity: Severity::High,
                category: Category::Security,
                role: None,
                description: None,
            }],
        };
        assert!(matches!(
            RuleCatalog::from_config(&config),
            Err(GateError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_rule_serializes_pattern_source() {
        let catalog = catalog();
        let rule = catalog.get("InvokeExpression").unwrap();
        let value = serde_json::to_value(rule).unwrap();
        assert_eq!(value["category"], "security");
        assert_eq!(value["severity"], "high");
        assert_eq!(value["pattern"], rule.pattern.as_str());
    }
}

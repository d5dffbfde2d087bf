//! Configuration module for scriptgate
//!
//! This module handles:
//! - Project-level configuration (scriptgate.toml)
//! - Quality gate threshold
//! - Scan and exclusion settings
//! - Project test runner settings
//! - Rule catalog adjustments

mod project_config;

pub use project_config::{
    glob_match,
    load_project_config,
    CustomRuleConfig,
    ExcludeConfig,
    ProjectConfig,
    ProjectTestsConfig,
    QualityGateConfig,
    ReportConfig,
    RulesConfig,
    ScanConfig,
    CONFIG_FILE_NAMES,
    DEFAULT_MINIMUM_SCORE,
};

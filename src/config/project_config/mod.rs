//! Project-level configuration support
//!
//! Loads per-project configuration from `scriptgate.toml` or
//! `.scriptgaterc.json` in the repository root.
//!
//! # Configuration Format
//!
//! ```toml
//! # scriptgate.toml
//!
//! [quality_gate]
//! minimum_score = 85
//!
//! [scan]
//! recursive = true
//! extensions = ["ps1", "psm1"]
//!
//! [exclude]
//! paths = ["build/", "**/Legacy/**"]
//!
//! [project_tests]
//! script = "tests/Invoke-ProjectTests.ps1"
//! command = "pwsh"
//! timeout_secs = 900
//!
//! [report]
//! enabled = true
//! directory = ".scriptgate/reports"
//!
//! [rules]
//! disabled = ["InsecureHttpUrl"]
//!
//! [[rules.custom]]
//! name = "NoWriteHost"
//! pattern = '(?i)\bWrite-Host\b'
//! severity = "medium"
//! category = "compatibility"
//! ```
//!
//! A config file that fails to parse is an error; it is never replaced by
//! defaults.

use crate::error::{GateError, GateResult};
use crate::models::{Category, Severity};
use crate::rules::RuleRole;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: &[&str] = &["scriptgate.toml", ".scriptgaterc.json"];

/// Built-in default exclusion patterns.
/// These are applied automatically unless `skip_defaults = true` in config.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["**/.git/**", "**/node_modules/**", "**/.scriptgate/**"];

/// Minimum overall score required to deploy
pub const DEFAULT_MINIMUM_SCORE: u8 = 90;

/// Project-level configuration loaded from scriptgate.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub quality_gate: QualityGateConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub project_tests: ProjectTestsConfig,

    #[serde(default)]
    pub report: ReportConfig,

    /// Rule catalog adjustments
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityGateConfig {
    /// Overall score (0-100) below which deployment is blocked
    #[serde(default = "default_minimum_score")]
    pub minimum_score: u8,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            minimum_score: default_minimum_score(),
        }
    }
}

fn default_minimum_score() -> u8 {
    DEFAULT_MINIMUM_SCORE
}

/// File discovery settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Extensions (without the dot) scanned when the root is a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["ps1".to_string(), "psm1".to_string()]
}

fn default_true() -> bool {
    true
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Paths/patterns to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,

    /// If true, disable built-in default exclusion patterns
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective exclusion patterns (defaults + user patterns).
    /// If `skip_defaults` is true, only user patterns are returned.
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_defaults {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.paths {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }

    /// Check if a root-relative path should be excluded
    pub fn should_exclude(&self, relative: &Path) -> bool {
        let path_str = relative.to_string_lossy().replace('\\', "/");
        self.effective_patterns()
            .iter()
            .any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Project-owned test runner discovery and invocation
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectTestsConfig {
    /// Run the project's own tests after scoring
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Runner script, relative to the project root
    #[serde(default = "default_test_script")]
    pub script: PathBuf,

    /// Interpreter used to launch the script
    #[serde(default = "default_test_command")]
    pub command: String,

    /// Arguments placed before the script path
    #[serde(default = "default_test_args")]
    pub args: Vec<String>,

    /// Wall-clock limit; expiry counts as a failed run (0 = no limit)
    #[serde(default = "default_test_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProjectTestsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script: default_test_script(),
            command: default_test_command(),
            args: default_test_args(),
            timeout_secs: default_test_timeout(),
        }
    }
}

fn default_test_script() -> PathBuf {
    PathBuf::from("tests").join("Invoke-ProjectTests.ps1")
}

fn default_test_command() -> String {
    "pwsh".to_string()
}

fn default_test_args() -> Vec<String> {
    vec![
        "-NoProfile".to_string(),
        "-NonInteractive".to_string(),
        "-File".to_string(),
    ]
}

fn default_test_timeout() -> u64 {
    1800
}

/// Report generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Output directory, relative to the project root unless absolute
    #[serde(default = "default_report_dir")]
    pub directory: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_report_dir(),
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".scriptgate").join("reports")
}

/// Rule catalog adjustments
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    /// Built-in rule names to drop (case-insensitive)
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Extra rules appended to the catalog
    #[serde(default)]
    pub custom: Vec<CustomRuleConfig>,
}

/// A user-defined rule
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRuleConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_custom_severity")]
    pub severity: Severity,
    pub category: Category,
    /// Defaults to `required` for standards, `disqualifying` otherwise
    #[serde(default)]
    pub role: Option<RuleRole>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_custom_severity() -> Severity {
    Severity::Medium
}

/// Load project configuration from the repository root.
///
/// Searches for `scriptgate.toml`, then `.scriptgaterc.json`. When `root` is a
/// file the lookup happens in its parent directory.
///
/// Returns default configuration if no config file is found, and an error if
/// one is found but cannot be parsed.
pub fn load_project_config(root: &Path) -> GateResult<ProjectConfig> {
    let dir = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };

    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }
        let config = if name.ends_with(".json") {
            load_json_config(&path)?
        } else {
            load_toml_config(&path)?
        };
        config.validate(&path)?;
        debug!("Loaded project config from {}", path.display());
        return Ok(config);
    }

    debug!("No project config found, using defaults");
    Ok(ProjectConfig::default())
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> GateResult<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| GateError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> GateResult<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| GateError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl ProjectConfig {
    fn validate(&self, path: &Path) -> GateResult<()> {
        let invalid = |message: String| GateError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        };

        if self.quality_gate.minimum_score > 100 {
            return Err(invalid(format!(
                "quality_gate.minimum_score must be between 0 and 100, got {}",
                self.quality_gate.minimum_score
            )));
        }
        if self.scan.extensions.is_empty() {
            return Err(invalid("scan.extensions must not be empty".to_string()));
        }
        if self.project_tests.command.trim().is_empty() {
            return Err(invalid("project_tests.command must not be empty".to_string()));
        }
        Ok(())
    }

    /// Normalized extension list (lowercase, no leading dot)
    pub fn extensions(&self) -> Vec<String> {
        self.scan
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect()
    }
}

/// Simple glob pattern matching
pub fn glob_match(pattern: &str, path: &str) -> bool {
    // **/X/**: X appears as a directory anywhere in the path
    if let Some(middle) = pattern
        .strip_prefix("**/")
        .and_then(|p| p.strip_suffix("/**"))
    {
        return path.contains(&format!("/{}/", middle)) || path.starts_with(&format!("{}/", middle));
    }

    // **/*.ext or prefix/**
    if let Some((prefix, suffix)) = pattern.split_once("**") {
        let prefix = prefix.trim_end_matches('/');
        let suffix = suffix.trim_start_matches('/');

        if !prefix.is_empty() && !path.starts_with(prefix) {
            return false;
        }
        return match suffix.split_once('*') {
            Some((before, after)) => {
                let file_name = path.rsplit('/').next().unwrap_or(path);
                file_name.starts_with(before) && file_name.ends_with(after)
            }
            None => suffix.is_empty() || path.ends_with(suffix),
        };
    }

    // Single * within a segment
    if let Some((prefix, suffix)) = pattern.split_once('*') {
        return path.starts_with(prefix) && path.ends_with(suffix);
    }

    // "build/" matches "build/x.ps1", NOT "src/build/x.ps1" or "buildtools/x.ps1"
    if pattern.ends_with('/') {
        return path.starts_with(pattern);
    }
    path == pattern
        || path
            .strip_prefix(pattern)
            .is_some_and(|rest| rest.starts_with('/'))
}

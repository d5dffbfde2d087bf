//! Hierarchical decision pipeline
//!
//! Runs the stages in a fixed order, once:
//! 1. Repository-level score (scan, three analyzers, aggregate)
//! 2. Project-level tests (optional, discovered under the project root)
//! 3. Deploy decision
//! 4. Report generation (optional)
//!
//! Only a missing root, or a report that cannot be written, aborts the run.
//! A project test runner that cannot be executed becomes a failed result.

use crate::analyzers::Analyzers;
use crate::config::{ProjectConfig, ProjectTestsConfig, DEFAULT_MINIMUM_SCORE};
use crate::error::GateResult;
use crate::models::{AggregateResult, PipelineDecision, ProjectTestResult};
use crate::reporters::{write_reports, GateReport};
use crate::rules::RuleCatalog;
use crate::runner::{ProjectTestRunner, ScriptTestRunner, TestRunOutcome};
use crate::scanner::{scan, ScanOptions};
use crate::scoring::aggregate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RepoLevelScore,
    ProjectLevelTests,
    Decision,
    ReportGeneration,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::RepoLevelScore => write!(f, "repository score"),
            Stage::ProjectLevelTests => write!(f, "project tests"),
            Stage::Decision => write!(f, "decision"),
            Stage::ReportGeneration => write!(f, "report generation"),
        }
    }
}

/// Project test stage outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTestStage {
    pub result: ProjectTestResult,
    /// Runner that was found, if any
    pub runner: Option<String>,
    /// Why the stage skipped or failed
    pub detail: Option<String>,
}

impl ProjectTestStage {
    fn skipped(detail: impl Into<String>) -> Self {
        Self {
            result: ProjectTestResult::Skipped,
            runner: None,
            detail: Some(detail.into()),
        }
    }
}

/// Everything a pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub project_path: PathBuf,
    pub minimum_score: u8,
    pub aggregate: AggregateResult,
    pub project_tests: ProjectTestStage,
    pub decision: PipelineDecision,
    /// JSON and Markdown report files, when reporting was requested
    pub reports: Option<(PathBuf, PathBuf)>,
}

impl PipelineOutcome {
    pub fn report(&self) -> GateReport {
        GateReport::new(self)
    }
}

/// The quality gate
pub struct QualityPipeline {
    analyzers: Analyzers,
    scan: ScanOptions,
    minimum_score: u8,
    project_tests: Option<ProjectTestsConfig>,
    report_dir: Option<PathBuf>,
}

impl QualityPipeline {
    /// Pipeline with default settings over the given catalog
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            analyzers: Analyzers::new(catalog),
            scan: ScanOptions::default(),
            minimum_score: DEFAULT_MINIMUM_SCORE,
            project_tests: Some(ProjectTestsConfig::default()),
            report_dir: None,
        }
    }

    /// Pipeline configured from a project config, including its rule adjustments
    pub fn from_config(config: &ProjectConfig) -> GateResult<Self> {
        let catalog = Arc::new(RuleCatalog::from_config(&config.rules)?);
        let mut pipeline = Self::new(catalog);
        pipeline.scan = ScanOptions::from_config(config);
        pipeline.minimum_score = config.quality_gate.minimum_score;
        pipeline.project_tests = config
            .project_tests
            .enabled
            .then(|| config.project_tests.clone());
        if config.report.enabled {
            pipeline.report_dir = Some(config.report.directory.clone());
        }
        Ok(pipeline)
    }

    pub fn with_minimum_score(mut self, minimum_score: u8) -> Self {
        self.minimum_score = minimum_score.min(100);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.scan.recursive = recursive;
        self
    }

    /// Skip the project test stage; the decision carries a warning instead.
    pub fn without_project_tests(mut self) -> Self {
        self.project_tests = None;
        self
    }

    /// Write reports to `dir`, relative to the project root unless absolute.
    pub fn with_reports(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    pub fn minimum_score(&self) -> u8 {
        self.minimum_score
    }

    /// Repository-level score only.
    pub fn score(&self, root: &Path) -> GateResult<AggregateResult> {
        info!("Stage: {}", Stage::RepoLevelScore);
        let files = scan(root, &self.scan)?;
        info!("Scanning {} files in {}", files.len(), root.display());
        let (compatibility, standards, security) = self.analyzers.analyze_all(&files);
        Ok(aggregate(compatibility, standards, security))
    }

    /// Full run, discovering the project's own test runner under `root`.
    pub fn run(&self, root: &Path) -> GateResult<PipelineOutcome> {
        let discovered = self
            .project_tests
            .as_ref()
            .and_then(|config| ScriptTestRunner::discover(&project_root(root), config));
        self.run_with_runner(root, discovered.as_ref().map(|r| r as &dyn ProjectTestRunner))
    }

    /// Full run with an explicit runner (`None` means none was found).
    pub fn run_with_runner(
        &self,
        root: &Path,
        runner: Option<&dyn ProjectTestRunner>,
    ) -> GateResult<PipelineOutcome> {
        let aggregate = self.score(root)?;

        info!("Stage: {}", Stage::ProjectLevelTests);
        let project_tests = if self.project_tests.is_none() {
            ProjectTestStage::skipped("disabled")
        } else {
            run_project_tests(runner)
        };

        info!("Stage: {}", Stage::Decision);
        let decision = decide(&aggregate, self.minimum_score, &project_tests);
        info!(
            "Decision: {} ({} critical issues, {} warnings)",
            if decision.can_deploy { "deploy" } else { "do not deploy" },
            decision.critical_issues.len(),
            decision.warnings.len()
        );

        let mut outcome = PipelineOutcome {
            project_path: root.to_path_buf(),
            minimum_score: self.minimum_score,
            aggregate,
            project_tests,
            decision,
            reports: None,
        };

        if let Some(dir) = &self.report_dir {
            info!("Stage: {}", Stage::ReportGeneration);
            let dir = if dir.is_absolute() {
                dir.clone()
            } else {
                project_root(root).join(dir)
            };
            outcome.reports = Some(write_reports(&dir, &outcome.report())?);
        }

        Ok(outcome)
    }
}

/// Directory that owns `root`: itself, or the parent of a single file
pub fn project_root(root: &Path) -> PathBuf {
    if root.is_file() {
        root.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        root.to_path_buf()
    }
}

/// Run the project tests, turning execution errors into a failed result.
pub fn run_project_tests(runner: Option<&dyn ProjectTestRunner>) -> ProjectTestStage {
    let Some(runner) = runner else {
        return ProjectTestStage::skipped("no project test runner found");
    };

    let description = runner.describe();
    match runner.run() {
        Ok(TestRunOutcome::Passed) => ProjectTestStage {
            result: ProjectTestResult::Passed,
            runner: Some(description),
            detail: None,
        },
        Ok(TestRunOutcome::Failed { exit_code }) => ProjectTestStage {
            result: ProjectTestResult::Failed,
            runner: Some(description),
            detail: exit_code.map(|code| format!("exit code {}", code)),
        },
        Err(e) => {
            warn!("Project test runner failed: {}", e);
            ProjectTestStage {
                result: ProjectTestResult::Failed,
                runner: Some(description),
                detail: Some(e.to_string()),
            }
        }
    }
}

/// Deploy decision.
///
/// Critical issues are listed in a fixed order: quality gate, critical
/// security issues, project tests. Deployment is allowed exactly when there
/// are none.
pub fn decide(
    aggregate: &AggregateResult,
    minimum_score: u8,
    project_tests: &ProjectTestStage,
) -> PipelineDecision {
    let mut critical_issues = Vec::new();
    let mut warnings = Vec::new();

    if aggregate.overall_score < f64::from(minimum_score) {
        critical_issues.push(format!(
            "Quality gate failed: overall score {:.2} is below the minimum of {}",
            aggregate.overall_score, minimum_score
        ));
    }

    if aggregate.has_critical_security_issues {
        critical_issues.push("Critical security issues detected".to_string());
    }

    match project_tests.result {
        ProjectTestResult::Failed => critical_issues.push(match &project_tests.detail {
            Some(detail) => format!("Project tests failed: {}", detail),
            None => "Project tests failed".to_string(),
        }),
        ProjectTestResult::Skipped => warnings.push(match &project_tests.detail {
            Some(detail) => format!("Project tests skipped: {}", detail),
            None => "Project tests skipped".to_string(),
        }),
        ProjectTestResult::Passed => {}
    }

    PipelineDecision {
        can_deploy: critical_issues.is_empty(),
        critical_issues,
        warnings,
        project_test_result: project_tests.result,
    }
}

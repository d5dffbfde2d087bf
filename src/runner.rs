//! Project-level test runner
//!
//! A project may ship its own test entry point at a fixed location under its
//! root. When present it is launched as a child process with its output sent
//! to the console's stderr, and its exit status decides the outcome.

use crate::config::ProjectTestsConfig;
use crate::error::{GateError, GateResult};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a runner that actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestRunOutcome {
    Passed,
    Failed { exit_code: Option<i32> },
}

/// Something that can run a project's own tests
pub trait ProjectTestRunner {
    /// Short description for logs and reports
    fn describe(&self) -> String;

    /// Run the tests. `Err` means the runner could not be executed at all.
    fn run(&self) -> GateResult<TestRunOutcome>;
}

/// Runs a script through an interpreter, e.g. `pwsh -File tests/Invoke-ProjectTests.ps1`
#[derive(Debug, Clone)]
pub struct ScriptTestRunner {
    working_dir: PathBuf,
    script: PathBuf,
    command: String,
    args: Vec<String>,
    /// `None` waits forever
    timeout: Option<Duration>,
}

impl ScriptTestRunner {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        command: impl Into<String>,
        args: Vec<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            script: script.into(),
            command: command.into(),
            args,
            timeout,
        }
    }

    /// Locate the configured runner script under `project_root`.
    ///
    /// Returns `None` when the script does not exist.
    pub fn discover(project_root: &Path, config: &ProjectTestsConfig) -> Option<Self> {
        let script = project_root.join(&config.script);
        if !script.is_file() {
            debug!("No project test runner at {}", script.display());
            return None;
        }

        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Some(Self::new(
            project_root,
            script,
            config.command.clone(),
            config.args.clone(),
            timeout,
        ))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    fn spawn(&self) -> GateResult<Child> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(&self.script)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            // stdout belongs to the gate's own output
            .stdout(std::io::stderr())
            .stderr(Stdio::inherit());

        command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GateError::ProjectTestExecution(format!(
                    "{} not found. Please install it first.",
                    self.command
                ))
            } else {
                GateError::ProjectTestExecution(format!("Failed to run {}: {}", self.describe(), e))
            }
        })
    }

    fn wait(&self, mut child: Child) -> GateResult<TestRunOutcome> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Ok(if status.success() {
                        TestRunOutcome::Passed
                    } else {
                        TestRunOutcome::Failed {
                            exit_code: status.code(),
                        }
                    });
                }
                Ok(None) => {
                    if let Some(timeout) = self.timeout {
                        if start.elapsed() > timeout {
                            let _ = child.kill();
                            let _ = child.wait();
                            warn!("{} timed out after {}s", self.describe(), timeout.as_secs());
                            return Err(GateError::ProjectTestExecution(format!(
                                "{} timed out after {}s",
                                self.describe(),
                                timeout.as_secs()
                            )));
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(GateError::ProjectTestExecution(format!(
                        "Failed to wait for {}: {}",
                        self.describe(),
                        e
                    )));
                }
            }
        }
    }
}

impl ProjectTestRunner for ScriptTestRunner {
    fn describe(&self) -> String {
        format!("{} {}", self.command, self.script.display())
    }

    fn run(&self) -> GateResult<TestRunOutcome> {
        info!("Running project tests: {}", self.describe());
        let child = self.spawn()?;
        self.wait(child)
    }
}

//! Integration tests for the scriptgate CLI
//!
//! These tests run the actual binary against temp directories to verify:
//! - Exit codes (0 deploy, 1 do not deploy, 2 missing path)
//! - JSON output is valid and carries the decision
//! - Report files are written on request
//! - Project-owned test runners decide the project test stage
//!
//! Each test uses its own isolated temp directory.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const WELL_WRITTEN: &str = r#"
<#
.SYNOPSIS
    Rotates log files.
.DESCRIPTION
    Compresses logs older than the retention window.
#>
param([int]$Days = 7)

try {
    Write-Verbose "Rotating logs older than $Days days"
    $cutoff = (Get-Date).AddDays(-$Days)
    [PSCustomObject]@{ Cutoff = $cutoff }
} catch {
    throw
}
"#;

fn scriptgate_bin() -> &'static str {
    env!("CARGO_BIN_EXE_scriptgate")
}

fn setup_repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}

/// Run scriptgate and return (stdout, stderr, exit_code)
fn run(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(scriptgate_bin())
        .args(args)
        .arg("--no-color")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute scriptgate binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_clean_repo_deploys() {
    let dir = setup_repo(&[("Rotate-Logs.ps1", WELL_WRITTEN)]);
    let (stdout, stderr, code) = run(&["gate", path_str(dir.path())]);

    assert_eq!(code, 0, "stdout: {stdout}\nstderr: {stderr}");
    assert!(stdout.contains("Score: 100.00/100"));
    assert!(stdout.contains("Excellent — ready for deployment"));
    assert!(stdout.contains("Project tests skipped"));
    assert!(stdout.contains("Decision: DEPLOY"));
}

#[test]
fn test_default_command_is_gate() {
    let dir = setup_repo(&[("Rotate-Logs.ps1", WELL_WRITTEN)]);
    let (stdout, _, code) = run(&[path_str(dir.path())]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Decision: DEPLOY"));
}

#[test]
fn test_critical_security_issue_blocks() {
    let dir = setup_repo(&[
        ("Rotate-Logs.ps1", WELL_WRITTEN),
        ("Connect.ps1", "$password = \"P@ssw0rd123\"\n"),
    ]);
    let (stdout, _, code) = run(&["gate", path_str(dir.path())]);

    assert_eq!(code, 1);
    assert!(stdout.contains("Critical security issues detected"));
    assert!(stdout.contains("Decision: DO NOT DEPLOY"));
}

#[test]
fn test_missing_path_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let (stdout, stderr, code) = run(&["gate", path_str(&missing), "--report"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("Path does not exist"), "stderr: {stderr}");
    assert!(stdout.is_empty());
    assert!(!missing.exists());
}

#[test]
fn test_json_output_is_the_decision_record() {
    let dir = setup_repo(&[("Partial.ps1", "try { Write-Verbose 'x' } catch { throw }\n")]);
    let (stdout, _, code) = run(&["gate", path_str(dir.path()), "--format", "json"]);

    // Standards 50: overall 0.4*100 + 0.4*50 + 0.2*100 = 80
    assert_eq!(code, 1);
    let record: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(record["scores"]["overall"], 80.0);
    assert_eq!(record["quality_gate"]["threshold"], 90);
    assert_eq!(record["quality_gate"]["passed"], false);
    assert_eq!(record["can_deploy"], false);
    assert_eq!(record["recommendation"], "Good — minor improvements recommended");
    assert_eq!(record["project_tests"]["result"], "skipped");
}

#[test]
fn test_min_score_flag_overrides_default() {
    let dir = setup_repo(&[("Partial.ps1", "try { Write-Verbose 'x' } catch { throw }\n")]);
    let (_, _, code) = run(&["gate", path_str(dir.path()), "--min-score", "80"]);
    assert_eq!(code, 0);
}

#[test]
fn test_min_score_from_config() {
    let dir = setup_repo(&[
        ("scriptgate.toml", "[quality_gate]\nminimum_score = 75\n"),
        ("Partial.ps1", "try { Write-Verbose 'x' } catch { throw }\n"),
    ]);
    let (_, _, code) = run(&["gate", path_str(dir.path())]);
    assert_eq!(code, 0);
}

#[test]
fn test_report_files_written() {
    let dir = setup_repo(&[("Rotate-Logs.ps1", WELL_WRITTEN)]);
    let out = dir.path().join("artifacts");
    let (stdout, _, code) = run(&[
        "gate",
        path_str(dir.path()),
        "--report-dir",
        path_str(&out),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Report:"));

    let mut names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2, "{names:?}");
    assert!(names[0].starts_with("quality-report-") && names[0].ends_with(".json"));
    assert!(names[1].starts_with("quality-report-") && names[1].ends_with(".md"));
}

#[test]
fn test_analyze_reports_scores_without_gating() {
    let dir = setup_repo(&[("Connect.ps1", "$password = \"P@ssw0rd123\"\n")]);
    let (stdout, _, code) = run(&[
        "analyze",
        path_str(dir.path()),
        "--category",
        "security",
        "--format",
        "json",
    ]);

    assert_eq!(code, 0);
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(result["category"], "security");
    assert_eq!(result["rate"], 0.0);
    assert_eq!(result["has_critical_issues"], true);
}

#[test]
fn test_rules_lists_catalog() {
    let dir = setup_repo(&[(
        "scriptgate.toml",
        r#"
[rules]
disabled = ["InsecureHttpUrl"]

[[rules.custom]]
name = "NoWriteHost"
pattern = '(?i)\bWrite-Host\b'
category = "standards"
role = "disqualifying"
"#,
    )]);
    let (stdout, _, code) = run(&["rules", path_str(dir.path()), "--format", "json"]);

    assert_eq!(code, 0);
    let rules: Vec<serde_json::Value> = serde_json::from_str(&stdout).expect("stdout is JSON");
    let names: Vec<&str> = rules.iter().filter_map(|r| r["name"].as_str()).collect();
    assert!(names.contains(&"PlaintextPassword"));
    assert!(names.contains(&"NoWriteHost"));
    assert!(!names.contains(&"InsecureHttpUrl"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = setup_repo(&[
        ("scriptgate.toml", "[quality_gate\n"),
        ("Rotate-Logs.ps1", WELL_WRITTEN),
    ]);
    let (_, stderr, code) = run(&["gate", path_str(dir.path())]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid config"), "stderr: {stderr}");
}

#[test]
fn test_invalid_custom_rule_is_an_error() {
    let dir = setup_repo(&[(
        "scriptgate.toml",
        "[[rules.custom]]\nname = \"Broken\"\npattern = \"(unclosed\"\ncategory = \"security\"\n",
    )]);
    let (_, stderr, code) = run(&["rules", path_str(dir.path())]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid rule 'Broken'"), "stderr: {stderr}");
}

#[cfg(unix)]
mod project_tests {
    use super::*;

    const CONFIG: &str = r#"
[project_tests]
script = "tests/run.sh"
command = "sh"
args = []
timeout_secs = 60
"#;

    #[test]
    fn test_passing_runner_allows_deploy() {
        let dir = setup_repo(&[
            ("scriptgate.toml", CONFIG),
            ("Rotate-Logs.ps1", WELL_WRITTEN),
            ("tests/run.sh", "exit 0\n"),
        ]);
        let (stdout, _, code) = run(&["gate", path_str(dir.path()), "--format", "json"]);

        assert_eq!(code, 0);
        let record: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
        assert_eq!(record["project_tests"]["available"], true);
        assert_eq!(record["project_tests"]["result"], "passed");
        assert!(record["warnings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_runner_output_keeps_json_stdout_clean() {
        let dir = setup_repo(&[
            ("scriptgate.toml", CONFIG),
            ("Rotate-Logs.ps1", WELL_WRITTEN),
            ("tests/run.sh", "echo 'Tests Passed: 12'\nexit 0\n"),
        ]);
        let (stdout, stderr, code) = run(&["gate", path_str(dir.path()), "--format", "json"]);

        assert_eq!(code, 0);
        let record: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
        assert_eq!(record["project_tests"]["result"], "passed");
        assert!(!stdout.contains("Tests Passed"));
        assert!(stderr.contains("Tests Passed: 12"), "stderr: {stderr}");
    }

    #[test]
    fn test_failing_runner_blocks_deploy() {
        let dir = setup_repo(&[
            ("scriptgate.toml", CONFIG),
            ("Rotate-Logs.ps1", WELL_WRITTEN),
            ("tests/run.sh", "exit 5\n"),
        ]);
        let (stdout, _, code) = run(&["gate", path_str(dir.path()), "--format", "json"]);

        assert_eq!(code, 1);
        let record: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
        assert_eq!(record["project_tests"]["result"], "failed");
        assert_eq!(record["critical_issues"][0], "Project tests failed: exit code 5");
    }

    #[test]
    fn test_skip_flag_never_runs_runner() {
        let dir = setup_repo(&[
            ("scriptgate.toml", CONFIG),
            ("Rotate-Logs.ps1", WELL_WRITTEN),
            ("tests/run.sh", "touch ran.txt\nexit 1\n"),
        ]);
        let (_, _, code) = run(&["gate", path_str(dir.path()), "--skip-project-tests"]);

        assert_eq!(code, 0);
        assert!(!dir.path().join("ran.txt").exists());
    }
}

//! CLI command definitions and handlers

mod analyze;
mod gate;
mod rules;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_project_config, ProjectConfig};

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse and validate a quality score threshold (0-100)
fn parse_min_score(s: &str) -> Result<u8, String> {
    let n: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid score", s))?;
    if n > 100 {
        Err("minimum score cannot exceed 100".to_string())
    } else {
        Ok(n)
    }
}

/// scriptgate - Quality gate for PowerShell repositories
#[derive(Parser, Debug)]
#[command(name = "scriptgate")]
#[command(
    version,
    about = "Quality gate for PowerShell repositories: 5.1 compatibility, coding standards and security in one deploy decision",
    long_about = "scriptgate scans .ps1 and .psm1 files, scores them for Windows PowerShell 5.1 \
compatibility, coding standards and security, runs the project's own tests when present, \
and decides whether the repository may be deployed.\n\n\
Run without a subcommand to gate the current directory:\n  \
scriptgate .",
    after_help = "\
Examples:
  scriptgate .                               Gate the current directory
  scriptgate gate . --min-score 80 --report  Lower threshold, write report files
  scriptgate analyze . --format json         Scores only, as JSON
  scriptgate analyze . --category security   One category in detail
  scriptgate rules                           List the effective rule catalog

Exit codes: 0 deploy, 1 do not deploy or error, 2 path not found"
)]
pub struct Cli {
    /// Path to repository or single script (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: one per core)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for the full quality gate
#[derive(Args, Debug, Clone)]
pub struct GateArgs {
    /// Minimum overall score required to deploy (0-100, default from config or 90)
    #[arg(long, value_parser = parse_min_score)]
    pub min_score: Option<u8>,

    /// Only scan the top-level directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Do not run the project's own tests
    #[arg(long)]
    pub skip_project_tests: bool,

    /// Write JSON and Markdown report files
    #[arg(long)]
    pub report: bool,

    /// Report directory (implies --report)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
    pub format: String,
}

impl Default for GateArgs {
    fn default() -> Self {
        Self {
            min_score: None,
            no_recursive: false,
            skip_project_tests: false,
            report: false,
            report_dir: None,
            format: "text".to_string(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full quality gate (default)
    #[command(after_help = "\
Examples:
  scriptgate gate .                          Gate with config defaults
  scriptgate gate . --min-score 75           Custom threshold
  scriptgate gate . --skip-project-tests     Score only, then decide
  scriptgate gate . --format json            Decision record on stdout")]
    Gate(GateArgs),

    /// Score the repository without a deploy decision
    Analyze {
        /// Show only one category: compatibility, standards, security
        #[arg(long, short = 'c', value_parser = ["compatibility", "compat", "standards", "security"])]
        category: Option<String>,

        /// Only scan the top-level directory
        #[arg(long)]
        no_recursive: bool,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,
    },

    /// List the effective rule catalog (built-in rules adjusted by config)
    Rules {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let pool = build_pool(cli.workers)?;
    pool.install(|| match &cli.command {
        None => gate::run(&cli.path, &GateArgs::default()),
        Some(Commands::Gate(args)) => gate::run(&cli.path, args),
        Some(Commands::Analyze {
            category,
            no_recursive,
            format,
        }) => analyze::run(&cli.path, category.as_deref(), *no_recursive, format),
        Some(Commands::Rules { format }) => rules::run(&cli.path, format),
    })
}

fn build_pool(workers: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = workers {
        builder = builder.num_threads(workers);
    }
    builder.build().context("Failed to build worker pool")
}

/// Project config for `path`, failing on a config file that does not parse
fn project_config(path: &Path) -> Result<ProjectConfig> {
    load_project_config(path).context("Failed to load project config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_min_score() {
        assert_eq!(parse_min_score("0"), Ok(0));
        assert_eq!(parse_min_score("100"), Ok(100));
        assert!(parse_min_score("101").is_err());
        assert!(parse_min_score("-1").is_err());
        assert!(parse_min_score("abc").is_err());
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
    }

    #[test]
    fn test_no_subcommand_means_gate_defaults() {
        let cli = Cli::try_parse_from(["scriptgate", "repo"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("repo"));
        assert_eq!(GateArgs::default().format, "text");
    }

    #[test]
    fn test_gate_flags() {
        let cli = Cli::try_parse_from(["scriptgate", "gate", "repo", "--min-score", "80", "--report"])
            .unwrap();
        match cli.command {
            Some(Commands::Gate(args)) => {
                assert_eq!(args.min_score, Some(80));
                assert!(args.report);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.path, PathBuf::from("repo"));
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["scriptgate", "analyze", "src", "-c", "security", "-f", "json"])
            .unwrap();
        match cli.command {
            Some(Commands::Analyze { category, format, .. }) => {
                assert_eq!(category.as_deref(), Some("security"));
                assert_eq!(format, "json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.path, PathBuf::from("src"));

        let cli = Cli::try_parse_from(["scriptgate", "gate", "--skip-project-tests"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Gate(ref a)) if a.skip_project_tests));
    }

    #[test]
    fn test_rejects_out_of_range_score() {
        assert!(Cli::try_parse_from(["scriptgate", "gate", "--min-score", "150"]).is_err());
    }
}

//! Gate command implementation
//!
//! Runs the full pipeline and maps the decision to the process exit code.

use super::{project_config, GateArgs};
use crate::pipeline::QualityPipeline;
use crate::reporters::{self, OutputFormat};

use anyhow::Result;
use console::style;
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

pub(super) fn run(path: &Path, args: &GateArgs) -> Result<ExitCode> {
    let format = OutputFormat::from_str(&args.format)?;
    let config = project_config(path)?;

    let mut pipeline = QualityPipeline::from_config(&config)?;
    if let Some(min_score) = args.min_score {
        pipeline = pipeline.with_minimum_score(min_score);
    }
    if args.no_recursive {
        pipeline = pipeline.recursive(false);
    }
    if args.skip_project_tests {
        pipeline = pipeline.without_project_tests();
    }
    if args.report || args.report_dir.is_some() {
        let dir = args
            .report_dir
            .clone()
            .unwrap_or_else(|| config.report.directory.clone());
        pipeline = pipeline.with_reports(dir);
    }

    let outcome = pipeline.run(path)?;
    let report = outcome.report();
    println!("{}", reporters::report_with_format(&report, format)?);

    if let (OutputFormat::Text, Some((json_path, md_path))) = (format, &outcome.reports) {
        println!(
            "{} {}\n{} {}",
            style("Report:").dim(),
            json_path.display(),
            style("Summary:").dim(),
            md_path.display()
        );
    }

    Ok(if outcome.decision.can_deploy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

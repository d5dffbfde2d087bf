//! Analyze command implementation
//!
//! Repository-level score only: no project tests, no decision, exit code 0
//! whenever scoring succeeds.

use super::project_config;
use crate::models::Category;
use crate::pipeline::QualityPipeline;
use crate::reporters::{self, OutputFormat};

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

pub(super) fn run(
    path: &Path,
    category: Option<&str>,
    no_recursive: bool,
    format: &str,
) -> Result<ExitCode> {
    let format = OutputFormat::from_str(format)?;
    let only = category.map(Category::from_str).transpose()?;
    let config = project_config(path)?;

    let mut pipeline = QualityPipeline::from_config(&config)?;
    if no_recursive {
        pipeline = pipeline.recursive(false);
    }

    let aggregate = pipeline.score(path)?;
    println!("{}", reporters::scores_with_format(&aggregate, only, format)?);
    Ok(ExitCode::SUCCESS)
}

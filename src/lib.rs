//! scriptgate - Quality gate for PowerShell repositories
//!
//! Scans `.ps1` / `.psm1` sources, scores them in three categories
//! (Windows PowerShell 5.1 compatibility, coding standards, security),
//! combines the rates into one weighted score and decides whether the
//! repository may be deployed.
//!
//! ```no_run
//! use scriptgate::config::load_project_config;
//! use scriptgate::pipeline::QualityPipeline;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new(".");
//! let config = load_project_config(root)?;
//! let outcome = QualityPipeline::from_config(&config)?.run(root)?;
//! println!("{:.2} deploy={}", outcome.aggregate.overall_score, outcome.decision.can_deploy);
//! # Ok(())
//! # }
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod rules;
pub mod runner;
pub mod scanner;
pub mod scoring;

pub use error::{GateError, GateResult};

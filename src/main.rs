//! scriptgate - Quality gate CLI for PowerShell repositories

use clap::Parser;
use scriptgate::cli;
use scriptgate::GateError;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<GateError>())
                .map(GateError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

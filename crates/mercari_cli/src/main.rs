//! `mercari` command-line entry point.
//!
//! # Responsibility
//! - Decode arguments into catalog use-case calls.
//! - Print JSON payloads shaped like the listing API responses.
//! - Map not-found and validation failures to distinct exit codes.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use mercari_core::{init_logging, CatalogConfig, ServiceError};
use std::process::ExitCode;

const EXIT_VALIDATION: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.resolve_config(CatalogConfig::from_env());

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let mut stdout = std::io::stdout().lock();
    match commands::run(&cli.command, &config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ServiceError>() {
        Some(service_err) if service_err.is_validation() => ExitCode::from(EXIT_VALIDATION),
        Some(service_err) if service_err.is_not_found() => ExitCode::from(EXIT_NOT_FOUND),
        _ => ExitCode::FAILURE,
    }
}

//! swarmctl: in-memory agent swarm with keyword task dispatch.
//!
//! This is the main entry point for the `swarmctl` CLI. It parses arguments,
//! resolves the config, installs logging, dispatches to the appropriate
//! command handler, and handles errors with proper exit codes.

mod agent;
mod cli;
mod commands;
mod config;
mod error;
mod events;
mod exit_codes;
mod fs;
mod ids;
mod logging;
mod orchestrator;
mod scan;
mod scenario;
mod scripts;
mod task;
mod tools;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;

    let env_filter = std::env::var("RUST_LOG").ok();
    let filter = logging::resolve_filter(
        cli.log_level.as_deref(),
        env_filter.as_deref(),
        Some(&config.log_level),
    );
    logging::init_tracing(&filter)?;

    commands::dispatch(cli.command, &config)
}

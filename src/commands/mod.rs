//! Command implementations for swarmctl.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod init;
mod run;
mod scan;
mod scripts;
mod serve;
mod show;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// `config` is the already-resolved effective config.
pub fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(args),
        Command::Run(args) => run::cmd_run(args, config),
        Command::Serve(args) => serve::cmd_serve(args, config),
        Command::Scan(args) => scan::cmd_scan(args, config),
        Command::Scripts(args) => scripts::cmd_scripts(args),
        Command::Show(args) => show::cmd_show(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ShowArgs;
    use crate::exit_codes;
    use tempfile::TempDir;

    #[test]
    fn dispatch_routes_to_correct_handler() {
        let temp_dir = TempDir::new().unwrap();
        let result = dispatch(
            Command::Show(ShowArgs {
                report: temp_dir.path().join("missing.json"),
            }),
            &Config::default(),
        );
        assert_eq!(result.unwrap_err().exit_code(), exit_codes::IO_FAILURE);
    }
}

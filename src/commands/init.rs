//! Implementation of the `swarmctl init` command.
//!
//! Writes a default `swarmctl.yaml` and a sample `scenario.yaml` into the
//! current directory. Nothing is written if either file already exists,
//! unless `--force` is given.

use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{Result, SwarmError};
use crate::fs::atomic_write_file;
use crate::scenario::SAMPLE_SCENARIO_YAML;
use std::path::Path;

/// Sample scenario written next to the config.
const SCENARIO_FILE_NAME: &str = "scenario.yaml";

const CONFIG_HEADER: &str = "# swarmctl configuration\n\
                             #\n\
                             # Every key is optional; missing keys use the defaults shown here.\n\n";

/// Execute the `swarmctl init` command.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let targets = [Path::new(CONFIG_FILE_NAME), Path::new(SCENARIO_FILE_NAME)];

    if !args.force {
        let existing: Vec<String> = targets
            .iter()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .collect();
        if !existing.is_empty() {
            return Err(SwarmError::UserError(format!(
                "refusing to overwrite existing files: {}\n\n\
                 To replace them, run:\n  swarmctl init --force",
                existing.join(", ")
            )));
        }
    }

    let config_yaml = format!("{}{}", CONFIG_HEADER, Config::default().to_yaml()?);
    atomic_write_file(targets[0], &config_yaml)?;
    atomic_write_file(targets[1], SAMPLE_SCENARIO_YAML)?;

    tracing::debug!(force = args.force, "scaffolding written");

    println!("Initialized swarmctl.");
    println!();
    println!("Created files:");
    for target in &targets {
        println!("  {}", target.display());
    }
    println!();
    println!("Run the sample with `swarmctl run {}`.", SCENARIO_FILE_NAME);

    Ok(())
}

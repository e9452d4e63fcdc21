//! Implementation of the `swarmctl run` command.
//!
//! Loads a scenario, drives a fresh orchestrator through it, optionally
//! writes the JSON report, and prints a summary.

use super::show::print_report;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{Result, SwarmError};
use crate::orchestrator::{ExecutionMode, Orchestrator};
use crate::scenario::{RunReport, Scenario};
use crate::task::TaskStatus;

/// Execute the `swarmctl run` command.
///
/// # Errors
///
/// Returns `TaskFailed` (exit code 3) after the report is written when any
/// task failed.
pub fn cmd_run(args: RunArgs, config: &Config) -> Result<()> {
    run_with(args, &Orchestrator::new(config))
}

fn run_with(args: RunArgs, orchestrator: &Orchestrator) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let mode = if args.inline {
        ExecutionMode::Inline
    } else {
        ExecutionMode::Background
    };

    tracing::info!(
        scenario = %scenario.name,
        agents = scenario.agents.len(),
        tasks = scenario.tasks.len(),
        inline = args.inline,
        "running scenario"
    );

    let run = scenario.execute(orchestrator, mode)?;
    let report = RunReport::from_run(&scenario.name, &run);

    let output = args.output.or_else(|| scenario.output.clone());
    if let Some(path) = &output {
        report.write(path, orchestrator.events())?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SwarmError::UserError(format!("failed to serialize report: {}", e)))?;
        println!("{}", json);
    } else {
        print_report(&report);
        if !run.timed_out.is_empty() {
            println!();
            println!(
                "Stopped waiting for {} task(s): {}",
                run.timed_out.len(),
                run.timed_out.join(", ")
            );
        }
        if let Some(path) = &output {
            println!("Report:  {}", path.display());
        }
        if let Some(log) = orchestrator.events().path() {
            println!("Events:  {}", log.display());
        }
    }

    let failed = report.count(TaskStatus::Failed);
    if failed > 0 {
        return Err(SwarmError::TaskFailed(format!(
            "{} of {} tasks failed",
            failed,
            report.tasks.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use crate::task::{AnalysisResult, Analyzer, Task};
    use crate::test_support::fast_config;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Refusing;

    impl Analyzer for Refusing {
        fn analyze(&self, _task: &Task) -> Result<AnalysisResult> {
            Err(SwarmError::TaskFailed("analysis refused".to_string()))
        }
    }

    fn write_scenario(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("scenario.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    fn args(scenario: PathBuf, output: Option<PathBuf>) -> RunArgs {
        RunArgs {
            scenario,
            output,
            inline: false,
            json: false,
        }
    }

    #[test]
    fn run_writes_report_to_output_flag() {
        let temp_dir = TempDir::new().unwrap();
        let scenario = write_scenario(
            temp_dir.path(),
            "agents:\n  - name: a\n    type: analyst\ntasks:\n  - description: webpack chunk order\n",
        );
        let output = temp_dir.path().join("reports").join("run.json");

        cmd_run(args(scenario, Some(output.clone())), &fast_config()).unwrap();

        let report = RunReport::read(&output).unwrap();
        assert_eq!(report.count(TaskStatus::Completed), 1);
        assert_eq!(report.agents.len(), 1);
    }

    #[test]
    fn run_without_output_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let scenario = write_scenario(temp_dir.path(), "tasks:\n  - description: anything\n");

        let mut run_args = args(scenario, None);
        run_args.inline = true;
        cmd_run(run_args, &fast_config()).unwrap();

        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn run_invalid_scenario_is_validation_error() {
        let temp_dir = TempDir::new().unwrap();
        let scenario = write_scenario(temp_dir.path(), "tasks: []\n");

        let err = cmd_run(args(scenario, None), &fast_config()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    }

    #[test]
    fn run_missing_scenario_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = cmd_run(
            args(temp_dir.path().join("missing.yaml"), None),
            &fast_config(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn failed_task_exits_with_task_failure_after_writing_report() {
        let temp_dir = TempDir::new().unwrap();
        let scenario = write_scenario(temp_dir.path(), "tasks:\n  - description: fabric\n");
        let output = temp_dir.path().join("run.json");
        let orchestrator = Orchestrator::new(&fast_config()).with_analyzer(Arc::new(Refusing));

        let err = run_with(args(scenario, Some(output.clone())), &orchestrator).unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::TASK_FAILURE);
        assert_eq!(err.to_string(), "1 of 1 tasks failed");
        let report = RunReport::read(&output).unwrap();
        assert_eq!(report.tasks[0].error(), Some("analysis refused"));
    }
}

//! Implementation of the `swarmctl show` command.
//!
//! Displays a saved run report. `swarmctl run` uses the same rendering for
//! its summary.

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::scenario::RunReport;
use crate::task::{Task, TaskStatus};

const RULE: &str =
    "================================================================================";

/// Execute the `swarmctl show` command.
pub fn cmd_show(args: ShowArgs) -> Result<()> {
    let report = RunReport::read(&args.report)?;
    print_report(&report);
    println!();
    println!("Path: {}", args.report.display());
    Ok(())
}

/// Print a report as a plain-text summary.
pub(super) fn print_report(report: &RunReport) {
    println!("{}", RULE);
    println!("{} [{}]", report.scenario, report.swarm.swarm_id);
    println!("{}", RULE);
    println!();

    println!("Topology:   {}", report.swarm.topology);
    println!("Strategy:   {}", report.swarm.strategy);
    println!("Max agents: {}", report.swarm.max_agents);
    println!(
        "Generated:  {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    println!();
    println!("Agents ({}):", report.agents.len());
    if report.agents.is_empty() {
        println!("  (none)");
    }
    for agent in &report.agents {
        println!(
            "  {:<22} {:<11} {}  [done {}, failed {}, avg {:.0} ms]",
            agent.id,
            agent.agent_type.as_str(),
            agent.name,
            agent.metrics.tasks_completed,
            agent.metrics.tasks_failed,
            agent.metrics.avg_execution_time_ms
        );
    }

    println!();
    println!("Tasks ({}):", report.tasks.len());
    for task in &report.tasks {
        print_task(task);
    }

    println!();
    println!(
        "Summary: {} completed, {} failed, {} unfinished",
        report.count(TaskStatus::Completed),
        report.count(TaskStatus::Failed),
        report.tasks.iter().filter(|t| !t.status.is_finished()).count()
    );
}

fn print_task(task: &Task) {
    let timing = task
        .execution_time_ms()
        .map(|ms| format!(" ({} ms)", ms))
        .unwrap_or_default();
    println!(
        "  [{}] {} {}{}",
        task.status, task.id, task.priority, timing
    );
    println!("      {}", task.description);

    if let Some(result) = task.result() {
        println!(
            "      -> {} ({} confidence): {}",
            result.analysis_type, result.confidence, result.summary
        );
    }
    if let Some(error) = task.error() {
        println!("      -> error: {}", error);
    }
    if !task.assigned_agents.is_empty() {
        println!("      agents: {}", task.assigned_agents.join(", "));
    }
}

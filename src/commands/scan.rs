//! Implementation of the `swarmctl scan` command.

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::{Result, SwarmError};
use crate::events::{Event, EventAction, EventSink};
use crate::fs::atomic_write_file;
use crate::scan::{ScanProfile, ScanReport, scan};
use serde_json::json;

/// Execute the `swarmctl scan` command.
pub fn cmd_scan(args: ScanArgs, config: &Config) -> Result<()> {
    let profile = match &args.profile {
        Some(path) => ScanProfile::load(path)?,
        None => ScanProfile::builtin()?,
    };

    let report = scan(&args.root, &profile, &args.capability)?;

    tracing::info!(
        profile = %report.profile,
        sections = report.sections.len(),
        evidence = report.evidence.len(),
        missing = report.missing_files.len(),
        "scan finished"
    );
    EventSink::new(config.events_log.clone()).emit(Event::new(EventAction::Scan).with_details(
        json!({
            "root": report.root.display().to_string(),
            "profile": report.profile,
            "capabilities": args.capability,
            "evidence": report.evidence.len(),
            "missing_files": report.missing_files,
            "root_cause": report.root_cause,
        }),
    ));

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| SwarmError::UserError(format!("failed to serialize scan report: {}", e)))?;

    if let Some(path) = &args.output {
        atomic_write_file(path, &format!("{}\n", json))?;
    }

    if args.json {
        println!("{}", json);
    } else {
        print_summary(&report);
        if let Some(path) = &args.output {
            println!();
            println!("Report: {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!("Scan of {} ({})", report.root.display(), report.profile);

    for section in &report.sections {
        println!();
        println!("{} [{}]", section.name, section.capability);
        if section.evidence.is_empty() {
            println!("  (no evidence)");
        }
        for line in &section.evidence {
            println!("  - {}", line);
        }
        for file in &section.missing {
            println!("  ! missing: {}", file);
        }
    }

    println!();
    println!("Root cause:");
    println!("  {}", report.root_cause);

    if !report.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for (key, text) in &report.recommendations {
            println!("  {}: {}", key, text);
        }
    }
}

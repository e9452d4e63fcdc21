//! JSON run reports.
//!
//! A report is the final state of a scenario run: swarm settings, agents
//! with their metrics, and every task with its outcome. Reports are written
//! atomically and read back by `swarmctl show`.

use super::ScenarioRun;
use crate::agent::Agent;
use crate::error::{Result, SwarmError};
use crate::events::{Event, EventAction, EventSink};
use crate::fs::atomic_write_file;
use crate::orchestrator::SwarmInfo;
use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

/// Bumped whenever a field changes meaning or is removed.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub scenario: String,
    pub swarm: SwarmInfo,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
}

impl RunReport {
    pub fn from_run(scenario: &str, run: &ScenarioRun) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now(),
            scenario: scenario.to_string(),
            swarm: run.swarm.clone(),
            agents: run.agents.clone(),
            tasks: run.tasks.clone(),
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Write the report as pretty JSON and record a `report_write` event.
    pub fn write(&self, path: &Path, events: &EventSink) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SwarmError::UserError(format!("failed to serialize report: {}", e)))?;
        atomic_write_file(path, &format!("{}\n", json))?;

        tracing::info!(path = %path.display(), tasks = self.tasks.len(), "report written");
        events.emit(Event::new(EventAction::ReportWrite).with_details(json!({
            "path": path.display().to_string(),
            "scenario": self.scenario,
            "tasks": self.tasks.len(),
            "failed": self.count(TaskStatus::Failed),
        })));
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Io(format!("failed to read report '{}': {}", path.display(), e))
        })?;

        let report: RunReport = serde_json::from_str(&content).map_err(|e| {
            SwarmError::ValidationError(format!(
                "'{}' is not a valid run report: {}",
                path.display(),
                e
            ))
        })?;

        if report.schema_version != REPORT_SCHEMA_VERSION {
            return Err(SwarmError::ValidationError(format!(
                "report schema version {} is not supported (expected {})",
                report.schema_version, REPORT_SCHEMA_VERSION
            )));
        }
        Ok(report)
    }
}

//! Scenario files for `swarmctl run`.
//!
//! A scenario declares a swarm shape, the agents to spawn, and the tasks to
//! submit. Running it drives an [`Orchestrator`] through exactly the same
//! operations the tool server exposes.
//!
//! # File Format
//!
//! ```yaml
//! name: fabric-debug
//! swarm:
//!   topology: mesh
//!   max_agents: 8
//! agents:
//!   - name: Fabric.js Research Specialist
//!     type: researcher
//!     capabilities: [fabric.js, canvas]
//! tasks:
//!   - description: Why is fabric.js undefined on the designer page?
//!     priority: high
//! wait:
//!   poll_interval_ms: 50
//!   max_polls: 100
//! output: reports/fabric-debug.json
//! ```

pub mod report;

use crate::agent::{Agent, AgentType};
use crate::config::{Topology, WaitSettings};
use crate::error::{Result, SwarmError};
use crate::orchestrator::{ExecutionMode, Orchestrator, SubmitOptions, SwarmInfo, SwarmInit};
use crate::task::{Priority, Task};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use report::RunReport;

/// Optional swarm overrides applied before agents are spawned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<Topology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agents: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// Cap on the number of agents assigned to this task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agents: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_scenario_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm: Option<SwarmBlock>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    /// Overrides the config's polling settings while waiting for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<WaitSettings>,
    /// Report path, relative to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

fn default_scenario_name() -> String {
    "scenario".to_string()
}

/// Everything observed after a scenario finished.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub swarm: SwarmInfo,
    pub agents: Vec<Agent>,
    /// Final task states in submission order.
    pub tasks: Vec<Task>,
    /// Ids of tasks still unfinished when waiting gave up.
    pub timed_out: Vec<String>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Io(format!(
                "failed to read scenario '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(yaml).map_err(|e| {
            SwarmError::ValidationError(format!("failed to parse scenario YAML: {}", e))
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject scenarios that could never do useful work.
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(SwarmError::ValidationError(format!(
                "scenario '{}' declares no tasks",
                self.name
            )));
        }

        if let Some((i, _)) = self
            .tasks
            .iter()
            .enumerate()
            .find(|(_, t)| t.description.trim().is_empty())
        {
            return Err(SwarmError::ValidationError(format!(
                "task #{} has an empty description",
                i + 1
            )));
        }

        if self.swarm.as_ref().and_then(|s| s.max_agents) == Some(0) {
            return Err(SwarmError::ValidationError(
                "swarm.max_agents must be greater than 0".to_string(),
            ));
        }

        if self.wait.is_some_and(|w| w.max_polls == 0) {
            return Err(SwarmError::ValidationError(
                "wait.max_polls must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Run the scenario to completion.
    ///
    /// All tasks are submitted before any is awaited, so background tasks
    /// run concurrently. Task failures are part of the returned run, not an
    /// error.
    pub fn execute(&self, orchestrator: &Orchestrator, mode: ExecutionMode) -> Result<ScenarioRun> {
        if let Some(block) = &self.swarm {
            orchestrator.init_swarm(SwarmInit {
                topology: block.topology,
                max_agents: block.max_agents,
                strategy: block.strategy.clone(),
            })?;
        }

        for spec in &self.agents {
            orchestrator.spawn_agent(&spec.name, spec.agent_type, spec.capabilities.clone())?;
        }

        let mut submitted = Vec::with_capacity(self.tasks.len());
        for spec in &self.tasks {
            let task = orchestrator.submit_task(
                &spec.description,
                SubmitOptions {
                    priority: spec.priority,
                    mode,
                    max_agents: spec.max_agents,
                },
            )?;
            submitted.push(task.id);
        }

        let mut tasks = Vec::with_capacity(submitted.len());
        let mut timed_out = Vec::new();
        for id in &submitted {
            let outcome = match self.wait {
                Some(wait) => orchestrator.wait_for_with(id, wait)?,
                None => orchestrator.wait_for(id)?,
            };
            if outcome.timed_out() {
                timed_out.push(id.clone());
            }
            tasks.push(outcome.into_task());
        }

        Ok(ScenarioRun {
            swarm: orchestrator.swarm(),
            agents: orchestrator.agents(),
            tasks,
            timed_out,
        })
    }
}

/// The scenario written by `swarmctl init`.
pub const SAMPLE_SCENARIO_YAML: &str = r#"# swarmctl scenario
#
# Run with: swarmctl run scenario.yaml

name: fabric-debug

swarm:
  topology: hierarchical
  max_agents: 8

agents:
  - name: Fabric.js Research Specialist
    type: researcher
    capabilities: [fabric.js, canvas, javascript]
  - name: Webpack Bundle Analyst
    type: analyst
    capabilities: [webpack, bundling]
  - name: WordPress Architecture Reviewer
    type: architect
    capabilities: [wordpress, php]
  - name: Canvas Timing Specialist
    type: specialist
    capabilities: [phantom, canvas]

tasks:
  - description: Find why fabric is undefined when the designer bundle loads
    priority: high
  - description: Check webpack chunk ordering for the vendor bundle
  - description: Explain the phantom canvas timeout in the design preview
    priority: low

output: swarmctl-report.json
"#;

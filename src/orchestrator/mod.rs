//! In-memory swarm orchestrator.
//!
//! Owns the agent registry, the task table, and the active swarm settings
//! behind one mutex. Clones share the same state, so a clone can be handed to
//! worker threads or to the tool server.
//!
//! State updates are single-step under the lock, so a poisoned mutex is
//! recovered rather than propagated.

mod executor;
mod state;
#[cfg(test)]
mod tests;

pub use executor::ExecutionMode;
pub use state::{SwarmInfo, SwarmStatus};

use crate::agent::{Agent, AgentType, select_agents};
use crate::config::{Config, Topology, WaitSettings};
use crate::error::{Result, SwarmError};
use crate::events::{Event, EventAction, EventSink};
use crate::task::{AnalysisResult, Analyzer, KeywordAnalyzer, Priority, Task, TaskStatus};
use chrono::Utc;
use serde_json::json;
use state::SwarmState;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Optional overrides for `init_swarm`; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SwarmInit {
    pub topology: Option<Topology>,
    pub max_agents: Option<usize>,
    pub strategy: Option<String>,
}

/// Options for `submit_task`.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub priority: Priority,
    pub mode: ExecutionMode,
    /// Truncate the selected agents to at most this many.
    pub max_agents: Option<usize>,
}

/// Result of waiting on a task.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    Finished(Task),
    /// Polling gave up; carries the last observed state.
    TimedOut(Task),
}

impl WaitOutcome {
    pub fn into_task(self) -> Task {
        match self {
            WaitOutcome::Finished(task) | WaitOutcome::TimedOut(task) => task,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct ExecutionSettings {
    analysis_delay: Duration,
    fallback_agent_count: usize,
    wait: WaitSettings,
}

#[derive(Clone)]
pub struct Orchestrator {
    state: Arc<Mutex<SwarmState>>,
    analyzer: Arc<dyn Analyzer>,
    events: EventSink,
    settings: ExecutionSettings,
}

impl Orchestrator {
    /// Create an orchestrator with the config's swarm defaults, the keyword
    /// analyzer, and the config's event log.
    pub fn new(config: &Config) -> Self {
        Self {
            state: Arc::new(Mutex::new(SwarmState::new(&config.swarm))),
            analyzer: Arc::new(KeywordAnalyzer),
            events: EventSink::new(config.events_log.clone()),
            settings: ExecutionSettings {
                analysis_delay: Duration::from_millis(config.analysis_delay_ms),
                fallback_agent_count: config.fallback_agent_count,
                wait: config.wait,
            },
        }
    }

    /// Replace the analyzer used for tasks submitted from now on.
    #[cfg(test)]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[cfg(test)]
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    fn lock(&self) -> MutexGuard<'_, SwarmState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    // =========================================================================
    // Swarm
    // =========================================================================

    /// Re-initialize the swarm with a fresh id. Agents and tasks are kept;
    /// a lower `max_agents` only blocks further spawns.
    pub fn init_swarm(&self, init: SwarmInit) -> Result<SwarmInfo> {
        if init.max_agents == Some(0) {
            return Err(SwarmError::ValidationError(
                "max_agents must be greater than zero".to_string(),
            ));
        }

        let info = {
            let mut state = self.lock();
            let current = &state.swarm;
            let info = SwarmInfo {
                swarm_id: state::new_swarm_id(),
                topology: init.topology.unwrap_or(current.topology),
                max_agents: init.max_agents.unwrap_or(current.max_agents),
                strategy: init.strategy.unwrap_or_else(|| current.strategy.clone()),
                initialized_at: Utc::now(),
            };
            state.registry.set_capacity(info.max_agents);
            state.swarm = info.clone();
            info
        };

        tracing::info!(
            swarm = %info.swarm_id,
            topology = %info.topology,
            max_agents = info.max_agents,
            "swarm initialized"
        );
        self.events.emit(Event::new(EventAction::SwarmInit).with_details(json!({
            "swarm_id": info.swarm_id,
            "topology": info.topology,
            "max_agents": info.max_agents,
            "strategy": info.strategy,
        })));
        Ok(info)
    }

    pub fn swarm(&self) -> SwarmInfo {
        self.lock().swarm.clone()
    }

    pub fn status(&self) -> SwarmStatus {
        self.lock().status()
    }

    // =========================================================================
    // Agents
    // =========================================================================

    pub fn spawn_agent(
        &self,
        name: &str,
        agent_type: AgentType,
        capabilities: Vec<String>,
    ) -> Result<Agent> {
        let agent = self.lock().registry.spawn(name, agent_type, capabilities)?;

        tracing::info!(agent = %agent.id, agent_type = %agent.agent_type, name = %agent.name, "agent spawned");
        self.events.emit(Event::new(EventAction::AgentSpawn).with_details(json!({
            "agent_id": agent.id,
            "name": agent.name,
            "type": agent.agent_type,
            "capabilities": agent.capabilities,
        })));
        Ok(agent)
    }

    /// All agents in registration order.
    pub fn agents(&self) -> Vec<Agent> {
        self.lock().registry.list().to_vec()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Store a new task and start executing it.
    ///
    /// In background mode the returned task is still pending; in inline mode
    /// it is already finished.
    pub fn submit_task(&self, description: &str, options: SubmitOptions) -> Result<Task> {
        let task = {
            let mut state = self.lock();
            let mut assigned = select_agents(
                &state.registry,
                description,
                self.settings.fallback_agent_count,
            );
            if let Some(limit) = options.max_agents {
                assigned.truncate(limit);
            }

            let task = Task::new(state.unused_task_id(), description, options.priority, assigned);
            state.tasks.insert(task.clone());
            task
        };

        tracing::info!(
            task = %task.id,
            priority = %task.priority,
            agents = task.assigned_agents.len(),
            "task submitted"
        );
        self.events.emit(
            Event::new(EventAction::TaskSubmit)
                .with_task(&task.id)
                .with_details(json!({
                    "description": task.description,
                    "priority": task.priority,
                    "assigned_agents": task.assigned_agents,
                })),
        );

        executor::dispatch(self, &task.id, options.mode);

        match options.mode {
            ExecutionMode::Inline => self.task(&task.id),
            ExecutionMode::Background => Ok(task),
        }
    }

    pub fn task(&self, id: &str) -> Result<Task> {
        self.lock()
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| task_not_found(id))
    }

    /// All tasks in submission order.
    #[cfg(test)]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.list().to_vec()
    }

    /// The analysis result of a completed task.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id
    /// - `UserError` when the task has not completed (including failed tasks)
    pub fn task_results(&self, id: &str) -> Result<AnalysisResult> {
        let task = self.task(id)?;
        match (task.status, task.result()) {
            (TaskStatus::Completed, Some(result)) => Ok(result.clone()),
            (status, _) => Err(SwarmError::UserError(format!(
                "Task {} not completed yet (status: {})",
                id, status
            ))),
        }
    }

    /// Wait for a task using the configured polling settings.
    pub fn wait_for(&self, id: &str) -> Result<WaitOutcome> {
        self.wait_for_with(id, self.settings.wait)
    }

    /// Poll until the task finishes or `max_polls` checks have been made.
    ///
    /// Giving up is not an error; the last observed task is returned as
    /// [`WaitOutcome::TimedOut`].
    pub fn wait_for_with(&self, id: &str, wait: WaitSettings) -> Result<WaitOutcome> {
        let interval = Duration::from_millis(wait.poll_interval_ms);
        let mut polls = 0;
        loop {
            let task = self.task(id)?;
            if task.status.is_finished() {
                return Ok(WaitOutcome::Finished(task));
            }
            polls += 1;
            if polls >= wait.max_polls {
                tracing::warn!(task = %id, polls, status = %task.status, "stopped waiting for task");
                return Ok(WaitOutcome::TimedOut(task));
            }
            std::thread::sleep(interval);
        }
    }
}

fn task_not_found(id: &str) -> SwarmError {
    SwarmError::NotFound(format!("Task {}", id))
}

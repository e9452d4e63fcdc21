//! Shared swarm state: swarm settings, agent registry, and task table.

use crate::agent::AgentRegistry;
use crate::config::{SwarmDefaults, Topology};
use crate::ids::generate_id;
use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Random hex characters appended to swarm ids.
const SWARM_ID_SUFFIX_LEN: usize = 4;

/// Random hex characters appended to task ids.
pub(super) const TASK_ID_SUFFIX_LEN: usize = 8;

/// The active swarm's declared shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmInfo {
    pub swarm_id: String,
    pub topology: Topology,
    pub max_agents: usize,
    pub strategy: String,
    pub initialized_at: DateTime<Utc>,
}

pub(crate) fn new_swarm_id() -> String {
    generate_id("swarm", SWARM_ID_SUFFIX_LEN)
}

impl SwarmInfo {
    pub fn from_defaults(defaults: &SwarmDefaults) -> Self {
        Self {
            swarm_id: new_swarm_id(),
            topology: defaults.topology,
            max_agents: defaults.max_agents,
            strategy: defaults.strategy.clone(),
            initialized_at: Utc::now(),
        }
    }
}

/// Aggregate counts returned by status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmStatus {
    pub swarm: SwarmInfo,
    pub agent_count: usize,
    pub agents_by_type: BTreeMap<String, usize>,
    /// Pending plus in-progress tasks.
    pub active_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub total_tasks: usize,
}

/// Tasks in submission order with an id index.
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskTable {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskTable {
    pub(crate) fn insert(&mut self, task: Task) {
        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        match self.index.get(id) {
            Some(&i) => self.tasks.get_mut(i),
            None => None,
        }
    }

    pub(crate) fn list(&self) -> &[Task] {
        &self.tasks
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }
}

/// Everything the orchestrator guards behind its mutex.
#[derive(Debug)]
pub(crate) struct SwarmState {
    pub(crate) swarm: SwarmInfo,
    pub(crate) registry: AgentRegistry,
    pub(crate) tasks: TaskTable,
}

impl SwarmState {
    pub(crate) fn new(defaults: &SwarmDefaults) -> Self {
        Self {
            swarm: SwarmInfo::from_defaults(defaults),
            registry: AgentRegistry::new(defaults.max_agents),
            tasks: TaskTable::default(),
        }
    }

    pub(crate) fn unused_task_id(&self) -> String {
        loop {
            let id = generate_id("task", TASK_ID_SUFFIX_LEN);
            if !self.tasks.contains(&id) {
                return id;
            }
        }
    }

    pub(crate) fn status(&self) -> SwarmStatus {
        let completed_tasks = self.tasks.count(TaskStatus::Completed);
        let failed_tasks = self.tasks.count(TaskStatus::Failed);
        let total_tasks = self.tasks.list().len();

        SwarmStatus {
            swarm: self.swarm.clone(),
            agent_count: self.registry.len(),
            agents_by_type: self.registry.count_by_type(),
            active_tasks: total_tasks - completed_tasks - failed_tasks,
            completed_tasks,
            failed_tasks,
            total_tasks,
        }
    }
}

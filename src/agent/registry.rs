//! In-memory agent registry.
//!
//! Agents are kept in registration order; lookups go through an id index.
//! The registry enforces the swarm's `max_agents` capacity and guarantees
//! identifier uniqueness for its lifetime.

use super::model::{Agent, AgentType};
use crate::error::{Result, SwarmError};
use crate::ids::generate_id;
use std::collections::{BTreeMap, HashMap};

/// Random hex characters appended to agent ids.
const AGENT_ID_SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    index: HashMap<String, usize>,
    capacity: usize,
}

impl AgentRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            agents: Vec::new(),
            index: HashMap::new(),
            capacity,
        }
    }

    /// Change the capacity. Existing agents are kept even if they exceed it;
    /// only new spawns are refused.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Register a new agent and return a copy of its record.
    ///
    /// # Errors
    ///
    /// - the name is blank
    /// - the registry is at capacity
    pub fn spawn(
        &mut self,
        name: &str,
        agent_type: AgentType,
        capabilities: Vec<String>,
    ) -> Result<Agent> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SwarmError::UserError("agent name must not be empty".to_string()));
        }

        if self.agents.len() >= self.capacity {
            return Err(SwarmError::UserError(format!(
                "swarm is at capacity ({} agents); raise max_agents to add '{}'",
                self.capacity, name
            )));
        }

        let capabilities = capabilities
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let id = self.unused_id();
        let agent = Agent::new(id.clone(), name, agent_type, capabilities);

        self.index.insert(id, self.agents.len());
        self.agents.push(agent.clone());
        Ok(agent)
    }

    fn unused_id(&self) -> String {
        loop {
            let id = generate_id("agent", AGENT_ID_SUFFIX_LEN);
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.index.get(id).map(|&i| &self.agents[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Agent> {
        match self.index.get(id) {
            Some(&i) => self.agents.get_mut(i),
            None => None,
        }
    }

    /// All agents in registration order.
    pub fn list(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Agent count per type, including zero counts for unused types.
    pub fn count_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = AgentType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();
        for agent in &self.agents {
            *counts.entry(agent.agent_type.as_str().to_string()).or_default() += 1;
        }
        counts
    }

    /// First registered agent of the given type.
    pub fn first_of_type(&self, agent_type: AgentType) -> Option<&Agent> {
        self.agents.iter().find(|a| a.agent_type == agent_type)
    }

    /// Count a completed task against an agent.
    pub fn record_success(&mut self, id: &str, elapsed_ms: f64) -> Result<()> {
        let agent = self.require_mut(id)?;
        agent.metrics.record_success(elapsed_ms);
        Ok(())
    }

    /// Count a failed task against an agent.
    pub fn record_failure(&mut self, id: &str) -> Result<()> {
        let agent = self.require_mut(id)?;
        agent.metrics.record_failure();
        Ok(())
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Agent> {
        self.get_mut(id)
            .ok_or_else(|| SwarmError::NotFound(format!("Agent {}", id)))
    }
}

//! Agent selection for a task description.
//!
//! # Selection Order
//!
//! 1. For each topic keyword in the description, the first registered agent
//!    of each preferred type for that topic
//! 2. Every agent whose type or capabilities mention a topic keyword
//! 3. If nothing matched, the first `fallback_count` agents
//!
//! The result is de-duplicated and returned in registration order. Selection
//! has no influence on which analysis result the task produces.

use super::model::AgentType;
use super::registry::AgentRegistry;
use crate::task::router::{Topic, topics_in};
use std::collections::HashSet;

/// Agent types preferred for a topic, in the order they are looked up.
pub fn preferred_types(topic: Topic) -> &'static [AgentType] {
    match topic {
        Topic::Fabric | Topic::Webpack => &[
            AgentType::Researcher,
            AgentType::Architect,
            AgentType::Analyst,
        ],
        Topic::Phantom => &[AgentType::Specialist, AgentType::Analyst],
    }
}

/// Pick agent ids for a task. Every returned id exists in `registry`.
pub fn select_agents(registry: &AgentRegistry, description: &str, fallback_count: usize) -> Vec<String> {
    let topics = topics_in(description);
    let mut chosen: HashSet<&str> = HashSet::new();

    for topic in &topics {
        for agent_type in preferred_types(*topic) {
            if let Some(agent) = registry.first_of_type(*agent_type) {
                chosen.insert(agent.id.as_str());
            }
        }
        for agent in registry.list() {
            if agent.mentions(topic.keyword()) {
                chosen.insert(agent.id.as_str());
            }
        }
    }

    if chosen.is_empty() {
        return registry
            .list()
            .iter()
            .take(fallback_count)
            .map(|a| a.id.clone())
            .collect();
    }

    registry
        .list()
        .iter()
        .filter(|a| chosen.contains(a.id.as_str()))
        .map(|a| a.id.clone())
        .collect()
}

//! Agent records and their metrics.

use crate::error::SwarmError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared role of an agent.
///
/// The type only influences which agents get assigned to a task; it never
/// changes the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Coordinator,
    Researcher,
    Analyst,
    Coder,
    Specialist,
    Architect,
    Optimizer,
}

impl AgentType {
    pub const ALL: [AgentType; 7] = [
        AgentType::Coordinator,
        AgentType::Researcher,
        AgentType::Analyst,
        AgentType::Coder,
        AgentType::Specialist,
        AgentType::Architect,
        AgentType::Optimizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Coordinator => "coordinator",
            AgentType::Researcher => "researcher",
            AgentType::Analyst => "analyst",
            AgentType::Coder => "coder",
            AgentType::Specialist => "specialist",
            AgentType::Architect => "architect",
            AgentType::Optimizer => "optimizer",
        }
    }

    /// Every valid type name, in declaration order.
    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                SwarmError::UserError(format!(
                    "invalid agent type '{}'; valid types: {}",
                    s,
                    Self::valid_names().join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Busy,
}

/// Execution statistics, updated from measured task durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    /// `completed / (completed + failed)`; 1.0 before any task ran.
    pub success_rate: f64,
    /// Mean over completed tasks only.
    pub avg_execution_time_ms: f64,
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self {
            tasks_completed: 0,
            tasks_failed: 0,
            success_rate: 1.0,
            avg_execution_time_ms: 0.0,
        }
    }
}

impl AgentMetrics {
    pub fn record_success(&mut self, elapsed_ms: f64) {
        self.tasks_completed += 1;
        let n = self.tasks_completed as f64;
        self.avg_execution_time_ms += (elapsed_ms - self.avg_execution_time_ms) / n;
        self.refresh_success_rate();
    }

    pub fn record_failure(&mut self) {
        self.tasks_failed += 1;
        self.refresh_success_rate();
    }

    fn refresh_success_rate(&mut self) {
        let total = self.tasks_completed + self.tasks_failed;
        self.success_rate = if total == 0 {
            1.0
        } else {
            self.tasks_completed as f64 / total as f64
        };
    }
}

/// A registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub status: AgentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metrics: AgentMetrics,

    /// Tasks currently executing with this agent assigned.
    #[serde(skip)]
    pub(crate) active_tasks: u32,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        agent_type: AgentType,
        capabilities: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            agent_type,
            capabilities,
            status: AgentStatus::Idle,
            created_at: Utc::now(),
            metrics: AgentMetrics::default(),
            active_tasks: 0,
        }
    }

    /// Whether the type name or any capability contains `keyword`
    /// (case-insensitive substring match).
    pub fn mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.agent_type.as_str().contains(&keyword)
            || self
                .capabilities
                .iter()
                .any(|cap| cap.to_lowercase().contains(&keyword))
    }

    pub(crate) fn begin_task(&mut self) {
        self.active_tasks += 1;
        self.status = AgentStatus::Busy;
    }

    pub(crate) fn end_task(&mut self) {
        self.active_tasks = self.active_tasks.saturating_sub(1);
        if self.active_tasks == 0 {
            self.status = AgentStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_type_parses_case_insensitively() {
        assert_eq!("Researcher".parse::<AgentType>().unwrap(), AgentType::Researcher);
        assert_eq!(" optimizer ".parse::<AgentType>().unwrap(), AgentType::Optimizer);
    }

    #[test]
    fn unknown_agent_type_lists_valid_names() {
        let err = "wizard".parse::<AgentType>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("wizard"));
        for name in AgentType::valid_names() {
            assert!(msg.contains(name));
        }
    }

    #[test]
    fn agent_type_serde_matches_display() {
        for t in AgentType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }

    #[test]
    fn metrics_running_average() {
        let mut m = AgentMetrics::default();
        m.record_success(100.0);
        m.record_success(300.0);

        assert_eq!(m.tasks_completed, 2);
        assert!((m.avg_execution_time_ms - 200.0).abs() < 1e-9);
        assert_eq!(m.success_rate, 1.0);
    }

    #[test]
    fn metrics_failures_lower_success_rate_but_not_average() {
        let mut m = AgentMetrics::default();
        m.record_success(50.0);
        m.record_failure();

        assert_eq!(m.tasks_failed, 1);
        assert!((m.success_rate - 0.5).abs() < 1e-9);
        assert!((m.avg_execution_time_ms - 50.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_json_keeps_every_float_bit() {
        let mut m = AgentMetrics::default();
        m.record_success(485.27160858770003);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("485.27160858770003"));
        assert_eq!(serde_json::from_str::<AgentMetrics>(&json).unwrap(), m);

        // Measured-style means: running averages of sub-second timings.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..5_000 {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let elapsed = (seed >> 11) as f64 / (1u64 << 53) as f64 * 1_000.0;
            m.record_success(elapsed);
            if seed % 7 == 0 {
                m.record_failure();
            }

            let json = serde_json::to_string(&m).unwrap();
            let back: AgentMetrics = serde_json::from_str(&json).unwrap();
            assert_eq!(back, m, "lost precision in {}", json);
        }
    }

    #[test]
    fn mentions_checks_type_and_capabilities() {
        let agent = Agent::new(
            "agent-1",
            "FabricInvestigator",
            AgentType::Researcher,
            vec!["Fabric_Investigation".to_string()],
        );

        assert!(agent.mentions("fabric"));
        assert!(agent.mentions("research"));
        assert!(!agent.mentions("webpack"));
    }

    #[test]
    fn overlapping_tasks_keep_agent_busy_until_last_ends() {
        let mut agent = Agent::new("agent-1", "a", AgentType::Coder, vec![]);
        agent.begin_task();
        agent.begin_task();
        agent.end_task();
        assert_eq!(agent.status, AgentStatus::Busy);
        agent.end_task();
        assert_eq!(agent.status, AgentStatus::Idle);
    }
}

//! Configuration types and defaults for swarmctl.
//!
//! This module defines enums, nested settings blocks, and the default value
//! functions used by the Config struct.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared swarm topology.
///
/// Recorded on the swarm and echoed back by status queries; it does not
/// change how tasks are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    #[default]
    Hierarchical,
    Mesh,
    Ring,
    Star,
}

impl Topology {
    /// Parse a topology from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hierarchical" => Some(Self::Hierarchical),
            "mesh" => Some(Self::Mesh),
            "ring" => Some(Self::Ring),
            "star" => Some(Self::Star),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Hierarchical => "hierarchical",
            Topology::Mesh => "mesh",
            Topology::Ring => "ring",
            Topology::Star => "star",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default swarm shape used when a scenario or tool call does not set one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmDefaults {
    pub topology: Topology,

    #[serde(default = "default_max_agents")]
    pub max_agents: usize,

    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for SwarmDefaults {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            max_agents: default_max_agents(),
            strategy: default_strategy(),
        }
    }
}

/// Bounded polling used when waiting for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

// Default value functions for serde
pub(crate) fn default_max_agents() -> usize {
    16
}
pub(crate) fn default_strategy() -> String {
    "adaptive".to_string()
}
pub(crate) fn default_analysis_delay_ms() -> u64 {
    100
}
pub(crate) fn default_fallback_agent_count() -> usize {
    3
}
pub(crate) fn default_poll_interval_ms() -> u64 {
    100
}
pub(crate) fn default_max_polls() -> u32 {
    50
}
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for swarmctl.
///
/// This struct represents the contents of `swarmctl.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Swarm settings
    // =========================================================================
    /// Swarm shape applied before any explicit `swarm_init`.
    pub swarm: SwarmDefaults,

    /// Number of agents assigned when no keyword matches a task.
    #[serde(default = "default_fallback_agent_count")]
    pub fallback_agent_count: usize,

    // =========================================================================
    // Execution settings
    // =========================================================================
    /// Simulated processing time before an analysis result is produced.
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    /// Polling used by `run` when waiting for background tasks.
    pub wait: WaitSettings,

    // =========================================================================
    // Logging settings
    // =========================================================================
    /// Optional NDJSON audit log path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_log: Option<PathBuf>,

    /// Tracing filter used when neither `--log-level` nor `RUST_LOG` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            swarm: SwarmDefaults::default(),
            fallback_agent_count: default_fallback_agent_count(),
            analysis_delay_ms: default_analysis_delay_ms(),
            wait: WaitSettings::default(),
            events_log: None,
            log_level: default_log_level(),
        }
    }
}

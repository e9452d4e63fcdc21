//! Task model for swarmctl.
//!
//! A task is a free-text work item. It is created pending with the agents
//! chosen at submission, moves to in_progress when execution starts, and
//! ends either completed (with an [`AnalysisResult`]) or failed (with an
//! error string). Finished tasks never change again.
//!
//! # Lifecycle
//!
//! ```text
//! pending -> in_progress -> completed
//!                        -> failed
//! ```

use crate::error::SwarmError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod analysis;
mod mutations;
pub mod router;

pub use analysis::{AnalysisResult, Analyzer, KeywordAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Coarse progress indicator: 0.0 pending, 0.5 in progress, 1.0 completed.
    ///
    /// A failed task reports 0.0.
    pub fn progress(&self) -> f64 {
        match self {
            TaskStatus::Completed => 1.0,
            TaskStatus::InProgress => 0.5,
            TaskStatus::Pending | TaskStatus::Failed => 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                SwarmError::UserError(format!(
                    "invalid priority '{}'; expected one of: low, medium, high, critical",
                    s
                ))
            })
    }
}

/// What a finished task produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Result(AnalysisResult),
    Error(String),
}

/// A submitted task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    // =========================================================================
    // Identity
    // =========================================================================
    /// Task identifier (`task-<millis>-<8 hex>`).
    pub id: String,

    /// Free-text description; drives routing and agent selection.
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    // =========================================================================
    // Assignment
    // =========================================================================
    /// Agent ids chosen at submission. Never changes afterwards.
    #[serde(default)]
    pub assigned_agents: Vec<String>,

    #[serde(default)]
    pub status: TaskStatus,

    // =========================================================================
    // Lifecycle timestamps
    // =========================================================================
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    // =========================================================================
    // Outcome
    // =========================================================================
    /// Absent until the task finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TaskOutcome>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        assigned_agents: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            assigned_agents,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            outcome: None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(TaskOutcome::Result(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(TaskOutcome::Error(message)) => Some(message),
            _ => None,
        }
    }

    /// Milliseconds from creation to completion, once finished.
    pub fn execution_time_ms(&self) -> Option<i64> {
        self.completed_at
            .map(|done| (done - self.created_at).num_milliseconds())
    }
}
